//! Token layer for Tollgate.
//!
//! This crate defines what a token *is* and how it gets signed:
//!
//! - **Types** ([`Token`], [`UserId`], [`Claims`]): the claim set that
//!   travels inside a sign, and the identity sessions are scoped by.
//! - **Signer** ([`Signer`] trait, [`JwtSigner`]): how a claim set is
//!   turned into a signature-protected string and back.
//! - **Errors** ([`SignError`]): how verification can fail.
//!
//! # Architecture
//!
//! The token layer is stateless. It knows nothing about sessions or
//! per-user limits; that policy lives one layer up.
//!
//! ```text
//! Auth (issue/validate decision) → Session (per-user policy) → Store
//!          ↓
//!   Token (sign/verify, this crate)
//! ```

mod error;
mod signer;
mod types;

pub use error::SignError;
pub use signer::Signer;
#[cfg(feature = "jwt")]
pub use signer::{JwtSigner, SignerConfig, SigningAlgorithm};
pub use types::{Claims, Token, USER_ID_CLAIM, UserId};
