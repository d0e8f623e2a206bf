//! Error types for the session layer.

use tollgate_token::UserId;

/// Errors a [`SessionStore`](crate::SessionStore) can report.
///
/// Stores carry no business rules, so these only describe storage
/// outcomes.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Nothing is stored for this user yet.
    ///
    /// The [`SessionManager`](crate::SessionManager) treats this as an
    /// empty session list, not as a failure.
    #[error("user id not found: {0}")]
    NotFound(UserId),

    /// The backend failed to read or write.
    #[error("internal storage error: {0}")]
    Internal(String),
}

/// Errors that can occur while admitting or checking sessions.
///
/// Store failures are kept apart from policy outcomes: "could not check"
/// ([`StoreRead`](Self::StoreRead)) is never reported as "checked and
/// denied" ([`Unauthorized`](Self::Unauthorized)).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading the user's session list failed.
    #[error("failed to read sessions for user {user_id}: {source}")]
    StoreRead {
        user_id: UserId,
        #[source]
        source: StoreError,
    },

    /// Writing the user's session list back failed.
    #[error("failed to write sessions for user {user_id}: {source}")]
    StoreWrite {
        user_id: UserId,
        #[source]
        source: StoreError,
    },

    /// The user already holds the maximum number of live sessions.
    /// `live` is the count observed when admission was refused.
    #[error("max sessions per user reached: {live} live sessions for user {user_id}")]
    MaxSessionsReached { user_id: UserId, live: usize },

    /// No live session exists for this token id.
    #[error("unauthorized session: {token_id}")]
    Unauthorized { token_id: String },
}
