//! Session-bound authentication: a decorator that ties every sign to a
//! live session.
//!
//! A signature alone stays valid until its embedded expiry. The session
//! layer can say "no" earlier (the user hit the session cap) and counts
//! how many signs a user holds, which a stateless signer can't express.
//! [`SessionAuthenticator`] asks both and only succeeds when both agree.

use tollgate_session::{SessionError, SessionRecord, SessionRegistry};
use tollgate_token::{Token, UserId};

use crate::{AuthError, Authenticator, USER_ID_MISSING};

/// Wraps an [`Authenticator`] and a [`SessionRegistry`].
///
/// ## Issuing
///
/// ```text
/// inner.generate_sign ──→ user_id claim ──→ registry.generate_session ──→ sign
///        │ err                 │ missing              │ err
///        ▼                     ▼                      ▼
///   propagated             Internal        MaxSessionsReached / Internal
/// ```
///
/// ## Validating
///
/// ```text
/// inner.validate_sign ──→ user_id claim ──→ registry.validate_session ──→ token
///        │ err                 │ missing              │ err
///        ▼                     ▼                      ▼
///   propagated            Unauthorized       Unauthorized / Internal
/// ```
///
/// The sign produced in step one is dropped whenever a later step fails,
/// so a caller never receives a sign without a registered session.
#[derive(Debug, Clone)]
pub struct SessionAuthenticator<A, R> {
    inner: A,
    registry: R,
}

impl<A: Authenticator, R: SessionRegistry> SessionAuthenticator<A, R> {
    /// Decorates `inner` with the session policy of `registry`.
    pub fn new(inner: A, registry: R) -> Self {
        Self { inner, registry }
    }

    /// The wrapped authenticator.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// The session registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }
}

impl<A: Authenticator, R: SessionRegistry> Authenticator for SessionAuthenticator<A, R> {
    async fn generate_sign(&self, token: &Token) -> Result<String, AuthError> {
        let sign = self.inner.generate_sign(token).await?;

        let user_id = token.user_id().ok_or_else(|| {
            tracing::warn!(token_id = %token.id, "refusing to issue token without user id");
            AuthError::internal(USER_ID_MISSING)
        })?;

        let record = SessionRecord::new(token.id.clone(), token.expire_date);
        self.registry
            .generate_session(&user_id, record)
            .await
            .map_err(|err| match err {
                SessionError::MaxSessionsReached { live, .. } => {
                    AuthError::MaxSessionsReached { live, source: err }
                }
                _ => AuthError::internal_from(err),
            })?;

        tracing::debug!(%user_id, token_id = %token.id, "sign issued");
        Ok(sign)
    }

    async fn validate_sign(&self, sign: &str) -> Result<Token, AuthError> {
        let token = self.inner.validate_sign(sign).await?;

        let user_id: UserId = token.user_id().ok_or_else(|| {
            tracing::debug!(token_id = %token.id, "sign carries no user id");
            AuthError::unauthorized(USER_ID_MISSING)
        })?;

        self.registry
            .validate_session(&user_id, &token.id)
            .await
            .map_err(|err| match err {
                SessionError::Unauthorized { .. } => AuthError::unauthorized_from(err),
                _ => AuthError::internal_from(err),
            })?;

        Ok(token)
    }
}
