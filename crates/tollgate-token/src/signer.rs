//! Signer trait and implementations for turning tokens into signs.
//!
//! A "signer" converts between a [`Token`] claim set and a
//! signature-protected string. The rest of Tollgate doesn't care HOW a
//! sign is produced: it just needs something that implements the
//! [`Signer`] trait. Swapping JWT for PASETO or a test double changes no
//! other code.
//!
//! Currently we provide [`JwtSigner`] (HMAC JWTs via `jsonwebtoken`).

use crate::{SignError, Token};

/// Produces and verifies signs.
///
/// Signing is plain CPU work, so both methods are synchronous.
///
/// - `Send + Sync` → one signer is shared by every concurrent request.
/// - `'static` → it owns its keys and borrows nothing temporary.
pub trait Signer: Send + Sync + 'static {
    /// Signs the token's id, expiry and claims.
    ///
    /// # Errors
    /// Returns [`SignError::Other`] if the claim set can't be signed.
    fn sign(&self, token: &Token) -> Result<String, SignError>;

    /// Verifies a sign and decodes the token it carries.
    ///
    /// # Errors
    /// - [`SignError::Malformed`]: the input isn't a structurally valid sign
    /// - [`SignError::Expired`]: signature is valid, expiry has passed
    /// - [`SignError::Other`]: any other verification failure
    fn verify(&self, sign: &str) -> Result<Token, SignError>;
}

// ---------------------------------------------------------------------------
// JwtSigner
// ---------------------------------------------------------------------------

#[cfg(feature = "jwt")]
pub use jwt::{JwtSigner, SignerConfig, SigningAlgorithm};

#[cfg(feature = "jwt")]
mod jwt {
    use std::fmt;

    use chrono::DateTime;
    use jsonwebtoken::errors::ErrorKind;
    use jsonwebtoken::{
        Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    };
    use serde::{Deserialize, Serialize};

    use super::Signer;
    use crate::{Claims, SignError, Token};

    /// HMAC algorithm used to sign tokens.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum SigningAlgorithm {
        #[default]
        HS256,
        HS384,
        HS512,
    }

    impl From<SigningAlgorithm> for Algorithm {
        fn from(alg: SigningAlgorithm) -> Self {
            match alg {
                SigningAlgorithm::HS256 => Algorithm::HS256,
                SigningAlgorithm::HS384 => Algorithm::HS384,
                SigningAlgorithm::HS512 => Algorithm::HS512,
            }
        }
    }

    /// Configuration for [`JwtSigner`].
    #[derive(Clone, Serialize, Deserialize)]
    pub struct SignerConfig {
        /// Shared HMAC secret.
        pub secret: String,

        /// Signing algorithm. Default: `HS256`.
        #[serde(default)]
        pub algorithm: SigningAlgorithm,
    }

    // The secret must never end up in logs.
    impl fmt::Debug for SignerConfig {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("SignerConfig")
                .field("secret", &"<redacted>")
                .field("algorithm", &self.algorithm)
                .finish()
        }
    }

    /// The claims layout inside a JWT: registered `jti`/`exp` plus the
    /// token's free-form map nested under `claims`.
    #[derive(Debug, Serialize, Deserialize)]
    struct JwtClaims {
        jti: String,
        exp: i64,
        #[serde(default)]
        claims: Claims,
    }

    /// A [`Signer`] producing HMAC-signed JWTs.
    ///
    /// Verification requires `exp` and checks it with zero leeway, so a
    /// token is rejected as soon as its `expire_date` passes. Expiry has
    /// second precision on the wire; sub-second parts are truncated.
    ///
    /// ```rust
    /// use chrono::{Duration, Utc};
    /// use tollgate_token::{JwtSigner, Signer, SigningAlgorithm, Token};
    ///
    /// let signer = JwtSigner::from_secret(b"secret", SigningAlgorithm::HS256);
    /// let token = Token::new("id", Utc::now() + Duration::hours(1))
    ///     .with_claim("user_id", "#01");
    ///
    /// let sign = signer.sign(&token).unwrap();
    /// let decoded = signer.verify(&sign).unwrap();
    /// assert_eq!(decoded.id, "id");
    /// ```
    #[derive(Clone)]
    pub struct JwtSigner {
        algorithm: Algorithm,
        encoding: EncodingKey,
        decoding: DecodingKey,
        validation: Validation,
    }

    impl JwtSigner {
        /// Creates a signer from config.
        pub fn new(config: &SignerConfig) -> Self {
            Self::from_secret(config.secret.as_bytes(), config.algorithm)
        }

        /// Creates a signer from a raw secret.
        pub fn from_secret(secret: &[u8], algorithm: SigningAlgorithm) -> Self {
            let algorithm = Algorithm::from(algorithm);

            let mut validation = Validation::new(algorithm);
            validation.leeway = 0;
            validation.validate_exp = true;
            validation.set_required_spec_claims(&["exp"]);

            Self {
                algorithm,
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
                validation,
            }
        }
    }

    impl fmt::Debug for JwtSigner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("JwtSigner")
                .field("algorithm", &self.algorithm)
                .finish_non_exhaustive()
        }
    }

    impl Signer for JwtSigner {
        fn sign(&self, token: &Token) -> Result<String, SignError> {
            let claims = JwtClaims {
                jti: token.id.clone(),
                exp: token.expire_date.timestamp(),
                claims: token.claims.clone(),
            };

            encode(&Header::new(self.algorithm), &claims, &self.encoding)
                .map_err(|e| SignError::Other(e.to_string()))
        }

        fn verify(&self, sign: &str) -> Result<Token, SignError> {
            let data = decode::<JwtClaims>(sign, &self.decoding, &self.validation)
                .map_err(map_jwt_error)?;
            let JwtClaims { jti, exp, claims } = data.claims;

            let expire_date = DateTime::from_timestamp(exp, 0).ok_or_else(|| {
                SignError::Malformed(format!("exp {exp} is out of range"))
            })?;

            Ok(Token {
                id: jti,
                expire_date,
                claims,
            })
        }
    }

    fn map_jwt_error(err: jsonwebtoken::errors::Error) -> SignError {
        match err.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => {
                SignError::Malformed(err.to_string())
            }
            ErrorKind::ExpiredSignature => SignError::Expired(err.to_string()),
            _ => SignError::Other(err.to_string()),
        }
    }

}
