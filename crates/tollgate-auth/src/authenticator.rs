//! The issue/validate contract shared by every authenticator.
//!
//! Callers (an HTTP handler, a gRPC interceptor, a CLI) depend on the
//! [`Authenticator`] trait only. Whether tokens are checked statelessly
//! or also against live sessions is decided where the authenticator is
//! built, not where it is used.

use std::future::Future;

use tollgate_token::Token;

use crate::AuthError;

/// Issues signs for tokens and validates signs back into tokens.
///
/// - `Send + Sync` → shared by every concurrent request.
/// - `'static` → lives as long as the service.
///
/// A failed call never yields a partial result: `generate_sign` returns
/// no sign and `validate_sign` returns no token when they fail.
///
/// # Example
///
/// ```rust
/// use tollgate_auth::{AuthError, Authenticator};
/// use tollgate_token::Token;
///
/// /// Rejects everything. Handy for maintenance mode.
/// struct Closed;
///
/// impl Authenticator for Closed {
///     async fn generate_sign(&self, _token: &Token) -> Result<String, AuthError> {
///         Err(AuthError::internal("issuance disabled"))
///     }
///
///     async fn validate_sign(&self, _sign: &str) -> Result<Token, AuthError> {
///         Err(AuthError::unauthorized("validation disabled"))
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Produces a sign for `token`.
    fn generate_sign(
        &self,
        token: &Token,
    ) -> impl Future<Output = Result<String, AuthError>> + Send;

    /// Verifies `sign` and returns the token it carries.
    fn validate_sign(
        &self,
        sign: &str,
    ) -> impl Future<Output = Result<Token, AuthError>> + Send;
}
