//! Unified error type for the Tollgate facade.

use tollgate_auth::AuthError;
use tollgate_session::SessionError;
use tollgate_token::SignError;
use tracing_subscriber::util::TryInitError;

use crate::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `tollgate` crate you deal with this single error type
/// instead of importing errors from each layer. The `#[from]` attribute
/// on each variant generates the `From` impl, so `?` converts layer
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TollgateError {
    /// Issuing or validating a token failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Direct session manager use failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Direct signer use failed.
    #[error(transparent)]
    Sign(#[from] SignError),

    /// Configuration was missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A global tracing subscriber was already installed.
    #[error("failed to initialize logging: {0}")]
    Logging(#[from] TryInitError),
}
