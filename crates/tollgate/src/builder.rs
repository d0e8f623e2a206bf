//! `TollgateBuilder`: wires signer, session manager and store together.
//!
//! This is the entry point for a service using Tollgate. It ties the
//! layers together: token → session → auth.

use std::num::NonZeroUsize;

use tollgate_auth::{BasicAuthenticator, SessionAuthenticator};
use tollgate_session::{SessionConfig, SessionManager, SessionStore};
use tollgate_token::{JwtSigner, SignerConfig, SigningAlgorithm};

use crate::{Config, ConfigError, TollgateError};

/// The authenticator [`TollgateBuilder::build`] produces: JWT signing
/// plus per-user session limits over store `S`.
pub type SessionBoundAuthenticator<S> =
    SessionAuthenticator<BasicAuthenticator<JwtSigner>, SessionManager<S>>;

/// Builder for a ready-to-use authenticator.
///
/// # Example
///
/// ```rust
/// use std::num::NonZeroUsize;
/// use tollgate::prelude::*;
///
/// let auth = TollgateBuilder::new()
///     .secret("change-me")
///     .max_sessions_per_user(NonZeroUsize::new(3).unwrap())
///     .build(MemoryStore::new())
///     .unwrap();
/// assert_eq!(auth.registry().policy().max_sessions_per_user.get(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TollgateBuilder {
    signer: Option<SignerConfig>,
    session_config: SessionConfig,
}

impl TollgateBuilder {
    /// Creates a builder with no signer and default session settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            signer: Some(config.signer.clone()),
            session_config: config.sessions.clone(),
        }
    }

    /// Sets the signer configuration.
    pub fn signer(mut self, config: SignerConfig) -> Self {
        self.signer = Some(config);
        self
    }

    /// Shorthand for an `HS256` signer with the given secret.
    pub fn secret(self, secret: impl Into<String>) -> Self {
        self.signer(SignerConfig {
            secret: secret.into(),
            algorithm: SigningAlgorithm::default(),
        })
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Overrides the per-user session cap.
    pub fn max_sessions_per_user(mut self, max: NonZeroUsize) -> Self {
        self.session_config.max_sessions_per_user = Some(max);
        self
    }

    /// Builds the stateless authenticator only. Session settings are
    /// ignored.
    ///
    /// # Errors
    /// [`ConfigError::MissingSigner`] or [`ConfigError::EmptySecret`].
    pub fn build_stateless(&self) -> Result<BasicAuthenticator<JwtSigner>, TollgateError> {
        let signer = self.signer.as_ref().ok_or(ConfigError::MissingSigner)?;
        if signer.secret.is_empty() {
            return Err(ConfigError::EmptySecret.into());
        }
        Ok(BasicAuthenticator::new(JwtSigner::new(signer)))
    }

    /// Builds the session-bound authenticator over `store`.
    ///
    /// # Errors
    /// [`ConfigError::MissingSigner`] or [`ConfigError::EmptySecret`].
    pub fn build<S: SessionStore>(
        self,
        store: S,
    ) -> Result<SessionBoundAuthenticator<S>, TollgateError> {
        let basic = self.build_stateless()?;
        let manager = SessionManager::with_config(store, &self.session_config);

        tracing::info!(
            max_sessions_per_user = manager.policy().max_sessions_per_user.get(),
            "session-bound authenticator ready"
        );
        Ok(SessionAuthenticator::new(basic, manager))
    }
}
