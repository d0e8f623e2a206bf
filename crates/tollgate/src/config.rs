//! Service configuration, read from TOML.
//!
//! ```toml
//! [signer]
//! secret = "change-me"
//! algorithm = "HS256"
//!
//! [sessions]
//! max_sessions_per_user = 5
//!
//! [logging]
//! filters = ["tollgate_session=debug"]
//! format = "compact"
//! ```
//!
//! Only `[signer]` is required. Unset session fields are resolved to
//! their defaults once, when the session manager is built.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tollgate_session::SessionConfig;
use tollgate_token::SignerConfig;
use tracing_subscriber::filter::Directive;

/// Errors raised while loading or checking configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file couldn't be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file isn't valid TOML or doesn't match the expected shape.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// No signer was configured before building an authenticator.
    #[error("no signer configured")]
    MissingSigner,

    /// The signing secret is empty.
    #[error("signer secret must not be empty")]
    EmptySecret,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Extra filter directives on top of `RUST_LOG` (or `info`).
    #[serde(default, deserialize_with = "LoggingConfig::deserialize_filters")]
    pub filters: Vec<Directive>,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    fn deserialize_filters<'de, D>(deserializer: D) -> Result<Vec<Directive>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let dirs: Vec<String> = Deserialize::deserialize(deserializer)?;
        dirs.into_iter()
            .map(|dir| dir.parse().map_err(serde::de::Error::custom))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Top level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// How signs are produced and verified.
    pub signer: SignerConfig,

    /// Per-user session policy.
    #[serde(default)]
    pub sessions: SessionConfig,

    /// Logging setup.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parses and checks a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and checks a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks invariants serde can't express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signer.secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tollgate_token::SigningAlgorithm;

    use super::*;

    #[test]
    fn test_from_toml_str_minimal_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [signer]
            secret = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.signer.algorithm, SigningAlgorithm::HS256);
        assert_eq!(config.sessions.max_sessions_per_user, None);
        assert_eq!(config.sessions.resolve().max_sessions_per_user.get(), 5);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.logging.filters.is_empty());
    }

    #[test]
    fn test_from_toml_str_full() {
        let config = Config::from_toml_str(
            r#"
            [signer]
            secret = "secret"
            algorithm = "HS512"

            [sessions]
            max_sessions_per_user = 2

            [logging]
            filters = ["tollgate_session=debug"]
            format = "pretty"
            "#,
        )
        .unwrap();

        assert_eq!(config.signer.algorithm, SigningAlgorithm::HS512);
        assert_eq!(config.sessions.resolve().max_sessions_per_user.get(), 2);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.filters.len(), 1);
    }

    #[test]
    fn test_from_toml_str_zero_cap_is_rejected() {
        let result = Config::from_toml_str(
            r#"
            [signer]
            secret = "secret"

            [sessions]
            max_sessions_per_user = 0
            "#,
        );

        assert!(matches!(result, Err(ConfigError::Parse(_))), "got {result:?}");
    }

    #[test]
    fn test_from_toml_str_missing_signer_is_rejected() {
        let result = Config::from_toml_str("[sessions]\nmax_sessions_per_user = 3\n");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_toml_str_empty_secret_is_rejected() {
        let result = Config::from_toml_str("[signer]\nsecret = \"\"\n");

        assert!(matches!(result, Err(ConfigError::EmptySecret)));
    }

    #[test]
    fn test_from_toml_str_bad_filter_is_rejected() {
        let result = Config::from_toml_str(
            r#"
            [signer]
            secret = "secret"

            [logging]
            filters = ["tollgate=bogus"]
            "#,
        );

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = Config::load("/definitely/not/here/tollgate.toml");

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
