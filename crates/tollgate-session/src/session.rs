//! Session types: the records behind issued tokens and the admission policy.
//!
//! A "session" is the server's record of one issued token. It tracks:
//! - WHICH token it belongs to (`token_id`)
//! - WHEN it stops counting (`expire_date`)
//!
//! Records are never mutated. A record is live while its expiry is in
//! the future; after that it is ignored on read and dropped on the next
//! admission for the same user.

use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cap applied when [`SessionConfig::max_sessions_per_user`] is unset.
pub const DEFAULT_MAX_SESSIONS_PER_USER: NonZeroUsize =
    NonZeroUsize::new(5).unwrap();

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// User-facing session configuration.
///
/// Every field is optional; [`resolve`](Self::resolve) fills in the
/// defaults once, at construction time. Zero is not a valid cap and fails
/// to deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Maximum number of live sessions a single user may hold.
    ///
    /// Default: 5.
    #[serde(default)]
    pub max_sessions_per_user: Option<NonZeroUsize>,
}

impl SessionConfig {
    /// Resolves the optional fields into a concrete policy.
    pub fn resolve(&self) -> SessionPolicy {
        SessionPolicy {
            max_sessions_per_user: self
                .max_sessions_per_user
                .unwrap_or(DEFAULT_MAX_SESSIONS_PER_USER),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionPolicy
// ---------------------------------------------------------------------------

/// The resolved rules a [`SessionManager`](crate::SessionManager) enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Admission is refused once a user holds this many live sessions.
    pub max_sessions_per_user: NonZeroUsize,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        SessionConfig::default().resolve()
    }
}

// ---------------------------------------------------------------------------
// SessionRecord
// ---------------------------------------------------------------------------

/// One live authorization grant: the id of an issued token and the
/// instant it stops counting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Id of the token this session backs.
    pub token_id: String,

    /// Instant after which the session is no longer live.
    pub expire_date: DateTime<Utc>,
}

impl SessionRecord {
    /// Creates a record for the given token id and expiry.
    pub fn new(token_id: impl Into<String>, expire_date: DateTime<Utc>) -> Self {
        Self {
            token_id: token_id.into(),
            expire_date,
        }
    }

    /// Returns `true` if the session is still live at `now`.
    ///
    /// A session expiring exactly at `now` is already dead.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_date > now
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_resolve_unset_uses_default_of_five() {
        let policy = SessionConfig::default().resolve();

        assert_eq!(policy.max_sessions_per_user.get(), 5);
        assert_eq!(policy, SessionPolicy::default());
    }

    #[test]
    fn test_resolve_override_is_kept() {
        let config = SessionConfig {
            max_sessions_per_user: NonZeroUsize::new(2),
        };

        assert_eq!(config.resolve().max_sessions_per_user.get(), 2);
    }

    #[test]
    fn test_config_deserialize_missing_field_is_unset() {
        let config: SessionConfig = serde_json::from_value(json!({})).unwrap();

        assert_eq!(config.max_sessions_per_user, None);
    }

    #[test]
    fn test_config_deserialize_zero_is_rejected() {
        let result: Result<SessionConfig, _> =
            serde_json::from_value(json!({ "max_sessions_per_user": 0 }));

        assert!(result.is_err(), "zero must not be a valid cap");
    }

    #[test]
    fn test_config_deserialize_negative_is_rejected() {
        let result: Result<SessionConfig, _> =
            serde_json::from_value(json!({ "max_sessions_per_user": -1 }));

        assert!(result.is_err());
    }

    #[test]
    fn test_is_live_at_boundaries() {
        let now = Utc::now();

        assert!(SessionRecord::new("a", now + Duration::seconds(1)).is_live_at(now));
        assert!(!SessionRecord::new("b", now).is_live_at(now));
        assert!(!SessionRecord::new("c", now - Duration::seconds(1)).is_live_at(now));
    }
}
