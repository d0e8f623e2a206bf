//! Token authentication for Tollgate.
//!
//! Two [`Authenticator`] implementations, composed rather than inherited:
//!
//! - [`BasicAuthenticator`]: stateless. Signs and verifies through a
//!   [`Signer`](tollgate_token::Signer) and never touches sessions.
//! - [`SessionAuthenticator`]: a decorator around any authenticator
//!   that also registers a session on issue and demands a live session
//!   on validation.
//!
//! ```text
//! SessionAuthenticator
//!     ├── inner: BasicAuthenticator ──→ Signer
//!     └── registry: SessionManager ──→ SessionStore
//! ```
//!
//! Both report failures through one taxonomy, [`AuthError`], so callers
//! can branch on [`AuthErrorKind`] no matter which layer failed.

#![allow(async_fn_in_trait)]

mod authenticator;
mod basic;
mod error;
mod sessions;

pub use authenticator::Authenticator;
pub use basic::BasicAuthenticator;
pub use error::{AuthError, AuthErrorKind, USER_ID_MISSING};
pub use sessions::SessionAuthenticator;
