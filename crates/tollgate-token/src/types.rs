//! Core token types.
//!
//! A [`Token`] is the claim set a sign carries: an id, an expiry, and a
//! free-form map of claims. The session layer identifies a token by its
//! `id` and scopes it to a user through the `user_id` claim.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the claim that binds a token to a user.
pub const USER_ID_CLAIM: &str = "user_id";

/// Arbitrary key-value claims carried by a token.
pub type Claims = serde_json::Map<String, Value>;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifier of a user, the key under which sessions are stored.
///
/// Newtype over `String` so a user id can't be passed where a token id
/// is expected. Serialized as the bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Creates a user id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrows the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// The claim set behind a sign.
///
/// `id` must be unique per issuance; it is what a session record points
/// at. `claims` is an open map, but tokens used with session-bound
/// authentication must carry a non-empty string under [`USER_ID_CLAIM`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Unique id of this issuance.
    pub id: String,

    /// Instant after which the token is no longer valid.
    pub expire_date: DateTime<Utc>,

    /// Free-form claims.
    #[serde(default)]
    pub claims: Claims,
}

impl Token {
    /// Creates a token with no claims.
    pub fn new(id: impl Into<String>, expire_date: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            expire_date,
            claims: Claims::new(),
        }
    }

    /// Creates a token for `user_id` that expires `ttl` from now.
    ///
    /// The id is a fresh random 128-bit hex string and the `user_id`
    /// claim is already set.
    pub fn issue(user_id: &UserId, ttl: Duration) -> Self {
        Self::new(generate_token_id(), Utc::now() + ttl)
            .with_claim(USER_ID_CLAIM, user_id.as_str())
    }

    /// Adds (or replaces) a claim, builder-style.
    pub fn with_claim(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.claims.insert(key.into(), value.into());
        self
    }

    /// Reads the `user_id` claim.
    ///
    /// Returns `None` when the claim is absent, is not a string, or is an
    /// empty string. There is no fallback identity.
    pub fn user_id(&self) -> Option<UserId> {
        self.claims
            .get(USER_ID_CLAIM)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(UserId::from)
    }
}

/// Generates a random 32-character hex string (128 bits of entropy).
fn generate_token_id() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_user_id_present_returns_some() {
        let token =
            Token::new("token_id", expiry()).with_claim(USER_ID_CLAIM, "#01");

        assert_eq!(token.user_id(), Some(UserId::from("#01")));
    }

    #[test]
    fn test_user_id_absent_returns_none() {
        let token = Token::new("token_id", expiry()).with_claim("role", "admin");

        assert_eq!(token.user_id(), None);
    }

    #[test]
    fn test_user_id_wrong_type_returns_none() {
        let token = Token::new("token_id", expiry()).with_claim(USER_ID_CLAIM, 42);

        assert_eq!(token.user_id(), None);
    }

    #[test]
    fn test_user_id_empty_string_returns_none() {
        let token = Token::new("token_id", expiry()).with_claim(USER_ID_CLAIM, "");

        assert_eq!(token.user_id(), None);
    }

    #[test]
    fn test_issue_sets_user_claim_and_future_expiry() {
        let user = UserId::from("#01");

        let token = Token::issue(&user, Duration::hours(1));

        assert_eq!(token.user_id(), Some(user));
        assert!(token.expire_date > Utc::now());
        assert_eq!(token.id.len(), 32);
    }

    #[test]
    fn test_issue_generates_unique_ids() {
        let user = UserId::from("#01");

        let a = Token::issue(&user, Duration::hours(1));
        let b = Token::issue(&user, Duration::hours(1));

        assert_ne!(a.id, b.id, "token ids must be unique per issuance");
    }

    #[test]
    fn test_token_serializes_with_expected_field_names() {
        let token =
            Token::new("token_id", expiry()).with_claim(USER_ID_CLAIM, "#01");

        let value = serde_json::to_value(&token).unwrap();

        assert_eq!(
            value,
            json!({
                "id": "token_id",
                "expire_date": "2021-01-01T00:00:00Z",
                "claims": { "user_id": "#01" },
            })
        );
    }

    #[test]
    fn test_user_id_display_is_raw_string() {
        assert_eq!(UserId::new("#01").to_string(), "#01");
    }
}
