//! The unified error taxonomy of the auth layer.
//!
//! Lower layers each have their own error enum ([`SignError`],
//! [`SessionError`]). Callers of an [`Authenticator`](crate::Authenticator)
//! shouldn't need to know which layer failed, only what *kind* of failure
//! it was. Every lower-level error is wrapped, not replaced: its message
//! becomes the reason and the error itself stays reachable through
//! [`std::error::Error::source`].

use std::fmt;

use tollgate_session::SessionError;
use tollgate_token::SignError;

/// Reason reported when a token carries no usable `user_id` claim.
pub const USER_ID_MISSING: &str = "user id missing";

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by every [`Authenticator`](crate::Authenticator).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A lower-layer failure not otherwise classified: store errors,
    /// signer faults, or a token issued without a user id.
    #[error("internal auth error: {reason}")]
    Internal {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The sign is malformed, carries no user id, or its session is not
    /// live.
    #[error("unauthorized token: {reason}")]
    Unauthorized {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The signature is valid but the token is past its expiry.
    #[error("token expired: {reason}")]
    Expired {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The user already holds the maximum number of live sessions.
    #[error("max sessions reached: {source}")]
    MaxSessionsReached {
        /// Live sessions the user held when issuance was refused.
        live: usize,
        #[source]
        source: SessionError,
    },
}

impl AuthError {
    /// An internal error with no underlying cause.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
            source: None,
        }
    }

    /// An unauthorized error with no underlying cause.
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
            source: None,
        }
    }

    /// Wraps `err` as an internal error, keeping it as the source.
    pub fn internal_from(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal {
            reason: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Wraps `err` as an unauthorized error, keeping it as the source.
    pub fn unauthorized_from(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unauthorized {
            reason: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::Internal { .. } => AuthErrorKind::Internal,
            Self::Unauthorized { .. } => AuthErrorKind::Unauthorized,
            Self::Expired { .. } => AuthErrorKind::Expired,
            Self::MaxSessionsReached { .. } => AuthErrorKind::MaxSessionsReached,
        }
    }
}

/// Classifies verification failures: malformed input is the caller's
/// problem, expiry is expiry, the rest is ours.
impl From<SignError> for AuthError {
    fn from(err: SignError) -> Self {
        match err {
            SignError::Malformed(_) => Self::unauthorized_from(err),
            SignError::Expired(_) => Self::Expired {
                reason: err.to_string(),
                source: Some(Box::new(err)),
            },
            SignError::Other(_) => Self::internal_from(err),
        }
    }
}

/// The four categories of [`AuthError`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    Internal,
    Unauthorized,
    Expired,
    MaxSessionsReached,
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal => write!(f, "internal"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Expired => write!(f, "expired"),
            Self::MaxSessionsReached => write!(f, "max sessions reached"),
        }
    }
}
