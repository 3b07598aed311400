#![forbid(unsafe_code)]

//! Errors for theme propagation and configuration.
//!
//! [`ThemeError::MissingVariableSource`] and [`ThemeError::MissingLegacyTheme`]
//! are wiring mistakes in the UI tree and are surfaced immediately.
//! Environment failures are normally absorbed by the variable source; the
//! `Environment` variant exists for callers that query a host directly.

use std::path::PathBuf;

use thiserror::Error;
use tint_core::EnvironmentError;

pub type Result<T> = std::result::Result<T, ThemeError>;

#[derive(Debug, Error)]
pub enum ThemeError {
    /// A legacy adapter was mounted with no variable source above it.
    #[error("legacy adapter mounted outside any theme variable source")]
    MissingVariableSource,

    /// A legacy consumer rendered with no legacy adapter above it.
    #[error("no legacy theme in scope; mount a legacy adapter above this consumer")]
    MissingLegacyTheme,

    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ThemeError {
    /// Whether this is a tree-wiring mistake rather than a runtime failure.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingVariableSource | Self::MissingLegacyTheme | Self::Config(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Override keyed by a name outside the token vocabulary.
    #[error("unknown theme token `{name}`")]
    UnknownToken { name: String },

    #[error("invalid value `{value}` for `{token}`: expected a {expected}")]
    InvalidValue {
        token: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("invalid config: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(ThemeError::MissingVariableSource.is_configuration_error());
        assert!(ThemeError::MissingLegacyTheme.is_configuration_error());
        assert!(
            !ThemeError::from(EnvironmentError::unsupported("headless")).is_configuration_error()
        );
    }

    #[test]
    fn messages() {
        let err = ConfigError::InvalidValue {
            token: "spacing-m",
            value: "#fff".into(),
            expected: "length",
        };
        assert_eq!(
            err.to_string(),
            "invalid value `#fff` for `spacing-m`: expected a length"
        );
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "invalid config: a; b");
        let err = ThemeError::from(EnvironmentError::query_failed("timeout"));
        assert_eq!(err.to_string(), "theme query failed: timeout");
    }
}
