//! Stateless authentication straight through a [`Signer`].

use tollgate_token::{Signer, Token};

use crate::{AuthError, Authenticator};

/// An [`Authenticator`] that only signs and verifies.
///
/// A sign it accepts stays valid until its embedded expiry; there is no
/// way to revoke it early. Wrap it in a
/// [`SessionAuthenticator`](crate::SessionAuthenticator) for that.
#[derive(Debug, Clone)]
pub struct BasicAuthenticator<S> {
    signer: S,
}

impl<S: Signer> BasicAuthenticator<S> {
    /// Creates an authenticator over `signer`.
    pub fn new(signer: S) -> Self {
        Self { signer }
    }

    /// The wrapped signer.
    pub fn signer(&self) -> &S {
        &self.signer
    }
}

impl<S: Signer> Authenticator for BasicAuthenticator<S> {
    async fn generate_sign(&self, token: &Token) -> Result<String, AuthError> {
        self.signer
            .sign(token)
            .map_err(AuthError::internal_from)
    }

    async fn validate_sign(&self, sign: &str) -> Result<Token, AuthError> {
        let token = self.signer.verify(sign)?;
        tracing::trace!(token_id = %token.id, "signature verified");
        Ok(token)
    }
}
