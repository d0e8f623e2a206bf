//! The session manager: enforces per-user session caps and expiry.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Admitting a new session when a token is issued, unless the user is
//!   already at the cap
//! - Answering whether a token's session is still live
//! - Pruning expired sessions (only ever as a side effect of admission)
//!
//! # Concurrency note
//!
//! Admission is a read-check-write sequence against the store: read the
//! list, count live entries, write the list back. Two admissions for the
//! same user running interleaved could both see room under the cap and
//! both write, leaving the user above it.
//!
//! `SessionManager` closes that window itself: admissions are serialized
//! per user behind an async mutex, so `generate_session` for one user id
//! behaves as if run one at a time. Different users never wait on each
//! other. This only holds when every admission for a user goes through
//! the same manager instance; several processes sharing one store need
//! the store to provide its own per-key atomicity.
//!
//! Validation takes no lock. A session admitted concurrently with a
//! validation read may or may not be visible to it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tollgate_token::UserId;

use crate::{
    SessionConfig, SessionError, SessionPolicy, SessionRecord, SessionRegistry,
    SessionStore, StoreError,
};

/// Enforces "at most K live sessions per user" on top of a
/// [`SessionStore`].
///
/// ## Lifecycle of a record
///
/// ```text
/// generate_session() ──→ [live] ──(expire_date passes)──→ [expired]
///                          │                                  │
///                   validate_session() ok          filtered on every read,
///                                                  dropped by the next
///                                                  generate_session()
/// ```
pub struct SessionManager<S> {
    store: S,
    policy: SessionPolicy,
    locks: UserLocks,
}

impl<S: SessionStore> SessionManager<S> {
    /// Creates a manager enforcing `policy` over `store`.
    pub fn new(store: S, policy: SessionPolicy) -> Self {
        Self {
            store,
            policy,
            locks: UserLocks::default(),
        }
    }

    /// Creates a manager from unresolved config, filling in defaults.
    pub fn with_config(store: S, config: &SessionConfig) -> Self {
        Self::new(store, config.resolve())
    }

    /// The policy this manager enforces.
    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Admits a new session for `user_id`.
    ///
    /// Reads the user's list, drops expired records, and refuses if the
    /// remaining live records already reach the cap. Otherwise appends
    /// `record` and writes the pruned list back, so every successful
    /// admission is also a cleanup pass. A refused admission leaves the
    /// store untouched.
    ///
    /// `record.expire_date` is taken as given and not re-validated.
    ///
    /// # Errors
    /// - [`SessionError::MaxSessionsReached`]: user is at the cap
    /// - [`SessionError::StoreRead`] / [`SessionError::StoreWrite`]
    pub async fn generate_session(
        &self,
        user_id: &UserId,
        record: SessionRecord,
    ) -> Result<(), SessionError> {
        let _guard = self.locks.acquire(user_id).await;

        let now = Utc::now();
        let mut live: Vec<SessionRecord> = self
            .read(user_id)
            .await?
            .into_iter()
            .filter(|s| s.is_live_at(now))
            .collect();

        let max = self.policy.max_sessions_per_user.get();
        if live.len() >= max {
            tracing::warn!(%user_id, live = live.len(), max, "max sessions reached");
            return Err(SessionError::MaxSessionsReached {
                user_id: user_id.clone(),
                live: live.len(),
            });
        }

        let token_id = record.token_id.clone();
        live.push(record);
        let count = live.len();

        self.store.set(user_id, live).await.map_err(|source| {
            tracing::error!(%user_id, error = %source, "session store write failed");
            SessionError::StoreWrite {
                user_id: user_id.clone(),
                source,
            }
        })?;

        tracing::info!(%user_id, %token_id, live = count, "session created");
        Ok(())
    }

    /// Succeeds iff `user_id` holds a live session for `token_id`.
    ///
    /// An expired session is reported exactly like a missing one.
    ///
    /// # Errors
    /// - [`SessionError::Unauthorized`]: no live session for the token
    /// - [`SessionError::StoreRead`]: the list couldn't be read
    pub async fn validate_session(
        &self,
        user_id: &UserId,
        token_id: &str,
    ) -> Result<(), SessionError> {
        let now = Utc::now();
        let found = self
            .read(user_id)
            .await?
            .iter()
            .any(|s| s.token_id == token_id && s.is_live_at(now));

        if !found {
            tracing::debug!(%user_id, %token_id, "no live session for token");
            return Err(SessionError::Unauthorized {
                token_id: token_id.to_owned(),
            });
        }

        tracing::debug!(%user_id, %token_id, "session validated");
        Ok(())
    }

    /// Returns the user's live sessions. Expired records are filtered
    /// out but not removed from the store.
    ///
    /// # Errors
    /// Returns [`SessionError::StoreRead`] if the list couldn't be read.
    pub async fn live_sessions(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<SessionRecord>, SessionError> {
        let now = Utc::now();
        Ok(self
            .read(user_id)
            .await?
            .into_iter()
            .filter(|s| s.is_live_at(now))
            .collect())
    }

    /// Reads a user's full list. A user the store has never seen has no
    /// sessions, so `NotFound` becomes an empty list here.
    async fn read(&self, user_id: &UserId) -> Result<Vec<SessionRecord>, SessionError> {
        match self.store.get(user_id).await {
            Ok(sessions) => Ok(sessions),
            Err(StoreError::NotFound(_)) => Ok(Vec::new()),
            Err(source) => {
                tracing::error!(%user_id, error = %source, "session store read failed");
                Err(SessionError::StoreRead {
                    user_id: user_id.clone(),
                    source,
                })
            }
        }
    }
}

impl<S: SessionStore> SessionRegistry for SessionManager<S> {
    async fn generate_session(
        &self,
        user_id: &UserId,
        record: SessionRecord,
    ) -> Result<(), SessionError> {
        SessionManager::generate_session(self, user_id, record).await
    }

    async fn validate_session(
        &self,
        user_id: &UserId,
        token_id: &str,
    ) -> Result<(), SessionError> {
        SessionManager::validate_session(self, user_id, token_id).await
    }
}

// ---------------------------------------------------------------------------
// Per-user locks
// ---------------------------------------------------------------------------

/// A table of per-user async mutexes.
///
/// Entries are created on demand and removed when the last holder
/// releases, so the table only ever contains users with an admission in
/// flight (plus entries left by cancelled waiters, which the next
/// release for that user removes).
#[derive(Default)]
struct UserLocks {
    table: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    async fn acquire(&self, user_id: &UserId) -> UserLockGuard<'_> {
        // The std mutex guard must be gone before the `.await`.
        let lock = {
            let mut table = self.table();
            Arc::clone(table.entry(user_id.clone()).or_default())
        };
        let guard = lock.lock_owned().await;

        UserLockGuard {
            locks: self,
            user_id: user_id.clone(),
            guard: Some(guard),
        }
    }

    fn table(&self) -> MutexGuard<'_, HashMap<UserId, Arc<AsyncMutex<()>>>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.table().len()
    }
}

struct UserLockGuard<'a> {
    locks: &'a UserLocks,
    user_id: UserId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserLockGuard<'_> {
    fn drop(&mut self) {
        let mut table = self.locks.table();
        drop(self.guard.take());

        // Only the table's own reference left: nobody holds or waits.
        if table
            .get(&self.user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            table.remove(&self.user_id);
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
