//! The seam between authentication and session policy.
//!
//! The auth layer doesn't talk to [`SessionManager`](crate::SessionManager)
//! directly. It depends on the [`SessionRegistry`] trait, so the policy
//! can be replaced (or mocked in tests) without touching signing code.

use std::future::Future;

use tollgate_token::UserId;

use crate::{SessionError, SessionRecord};

/// Admits new sessions and answers liveness questions.
///
/// # Example
///
/// ```rust
/// use tollgate_session::{SessionError, SessionRecord, SessionRegistry};
/// use tollgate_token::UserId;
///
/// /// Admits everything and honors every token. Tests only!
/// struct OpenRegistry;
///
/// impl SessionRegistry for OpenRegistry {
///     async fn generate_session(
///         &self,
///         _user_id: &UserId,
///         _record: SessionRecord,
///     ) -> Result<(), SessionError> {
///         Ok(())
///     }
///
///     async fn validate_session(
///         &self,
///         _user_id: &UserId,
///         _token_id: &str,
///     ) -> Result<(), SessionError> {
///         Ok(())
///     }
/// }
/// ```
pub trait SessionRegistry: Send + Sync + 'static {
    /// Registers a new session for `user_id`.
    ///
    /// # Errors
    /// - [`SessionError::MaxSessionsReached`]: the user is at the cap
    /// - [`SessionError::StoreRead`] / [`SessionError::StoreWrite`]:
    ///   storage failed
    fn generate_session(
        &self,
        user_id: &UserId,
        record: SessionRecord,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Succeeds iff `user_id` holds a live session for `token_id`.
    ///
    /// # Errors
    /// - [`SessionError::Unauthorized`]: no live session for the token
    /// - [`SessionError::StoreRead`]: storage failed
    fn validate_session(
        &self,
        user_id: &UserId,
        token_id: &str,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;
}
