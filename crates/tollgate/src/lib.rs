//! # Tollgate
//!
//! Signed, stateless tokens with a stateful policy on top: each user may
//! hold at most N live tokens at once, and a token is only honored while
//! the session behind it is live.
//!
//! This crate is the front door. It re-exports the layer crates and adds
//! what a service needs around them: a TOML [`Config`], logging setup
//! ([`init_logging`]), a [`TollgateBuilder`] that wires signer, session
//! manager and store together, and a single [`TollgateError`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tollgate::prelude::*;
//!
//! # async fn run() -> Result<(), TollgateError> {
//! let config = Config::load("tollgate.toml")?;
//! init_logging(&config.logging)?;
//!
//! let auth = TollgateBuilder::from_config(&config).build(MemoryStore::new())?;
//!
//! let token = Token::issue(&UserId::from("alice"), chrono::Duration::hours(1));
//! let sign = auth.generate_sign(&token).await?;
//! let decoded = auth.validate_sign(&sign).await?;
//! assert_eq!(decoded.id, token.id);
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod error;
mod logging;

pub use builder::{SessionBoundAuthenticator, TollgateBuilder};
pub use config::{Config, ConfigError, LogFormat, LoggingConfig};
pub use error::TollgateError;
pub use logging::init_logging;

pub use tollgate_auth as auth;
pub use tollgate_session as session;
pub use tollgate_token as token;

/// Everything needed to issue and validate tokens, in one import.
pub mod prelude {
    pub use crate::{
        Config, LoggingConfig, SessionBoundAuthenticator, TollgateBuilder,
        TollgateError, init_logging,
    };
    pub use tollgate_auth::{
        AuthError, AuthErrorKind, Authenticator, BasicAuthenticator,
        SessionAuthenticator,
    };
    pub use tollgate_session::{
        MemoryStore, SessionConfig, SessionManager, SessionRecord,
        SessionRegistry, SessionStore,
    };
    pub use tollgate_token::{
        JwtSigner, Signer, SignerConfig, SigningAlgorithm, Token,
        USER_ID_CLAIM, UserId,
    };
}
