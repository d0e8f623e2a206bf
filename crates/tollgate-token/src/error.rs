//! Error types for the token layer.
//!
//! Each crate in Tollgate defines its own error enum. A `SignError` always
//! means the problem is in producing or checking a signature, never in
//! session bookkeeping.

/// Errors a [`Signer`](crate::Signer) can report.
///
/// Verification failures are split into three buckets because the
/// authentication layer treats them differently: a malformed sign is a
/// client mistake, an expired one is a normal end of life, and anything
/// else is an internal fault.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// The input is not a structurally valid sign (bad segments, bad
    /// base64, undecodable claims, missing required claims).
    #[error("malformed sign: {0}")]
    Malformed(String),

    /// The signature checks out but the embedded expiry has passed.
    #[error("sign expired: {0}")]
    Expired(String),

    /// Any other signing or verification failure (bad signature, wrong
    /// algorithm, key problems).
    #[error("signer failure: {0}")]
    Other(String),
}
