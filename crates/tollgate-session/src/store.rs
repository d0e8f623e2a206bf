//! Storage abstraction for per-user session lists.
//!
//! Tollgate doesn't care where sessions live: Redis, SQL, or a map in
//! memory. It only needs something that can fetch and replace the full
//! session list of one user, which is what [`SessionStore`] describes.
//!
//! Stores are deliberately dumb: no expiry filtering, no limits. All of
//! that belongs to the [`SessionManager`](crate::SessionManager).

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tollgate_token::UserId;

use crate::{SessionRecord, StoreError};

/// Key-value storage of session lists, keyed by user id.
///
/// # Contract
///
/// - `get` returns the list last written by `set` for that user, or
///   [`StoreError::NotFound`] if nothing was ever written. The session
///   manager treats `NotFound` as an empty list.
/// - `set` replaces the whole list.
/// - Each call is individually atomic. Stores don't need to make a
///   `get` followed by a `set` atomic; the manager serializes admissions
///   per user itself.
pub trait SessionStore: Send + Sync + 'static {
    /// Returns every stored session of a user, live or not.
    fn get(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<SessionRecord>, StoreError>> + Send;

    /// Replaces the stored sessions of a user.
    fn set(
        &self,
        user_id: &UserId,
        sessions: Vec<SessionRecord>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// A shared store is still a store, so callers can keep a handle to the
/// same storage the manager uses.
impl<S: SessionStore> SessionStore for Arc<S> {
    fn get(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<SessionRecord>, StoreError>> + Send {
        (**self).get(user_id)
    }

    fn set(
        &self,
        user_id: &UserId,
        sessions: Vec<SessionRecord>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).set(user_id, sessions)
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// An in-process [`SessionStore`] backed by a `HashMap`.
///
/// The map sits behind a Tokio `RwLock`: reads of different users run in
/// parallel, writes are exclusive. Nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<UserId, Vec<SessionRecord>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with session lists.
    pub fn with_sessions(
        sessions: impl IntoIterator<Item = (UserId, Vec<SessionRecord>)>,
    ) -> Self {
        Self {
            sessions: RwLock::new(sessions.into_iter().collect()),
        }
    }

    /// Returns the number of users with a stored list.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl SessionStore for MemoryStore {
    async fn get(&self, user_id: &UserId) -> Result<Vec<SessionRecord>, StoreError> {
        self.sessions
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(user_id.clone()))
    }

    async fn set(
        &self,
        user_id: &UserId,
        sessions: Vec<SessionRecord>,
    ) -> Result<(), StoreError> {
        self.sessions.write().await.insert(user_id.clone(), sessions);
        Ok(())
    }
}
