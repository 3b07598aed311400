#![forbid(unsafe_code)]

//! Bridge configuration loaded from TOML.
//!
//! ```toml
//! [appearance]
//! scheme = "system"      # system | light | dark
//! contrast = "standard"  # standard | more
//!
//! [watch]
//! poll_interval_ms = 1000
//!
//! [overrides]
//! "color-brand" = "#fb542b"
//! ```
//!
//! Every section is optional; missing keys take their defaults. Loading only
//! parses. Call [`BridgeConfig::validate`] (or [`BridgeConfig::validated`])
//! before building a palette from it.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tint_core::{ColorScheme, Contrast, SystemEnvironment};

use crate::error::ConfigError;
use crate::palette::StandardPalette;
use crate::token::ThemeToken;
use crate::value::StyleValue;

/// Environment variable holding the path of a config file.
pub const ENV_CONFIG_PATH: &str = "TINT_THEME_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    pub appearance: AppearanceConfig,
    pub watch: WatchConfig,
    /// Token name to CSS value text.
    pub overrides: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppearanceConfig {
    pub scheme: SchemePreference,
    pub contrast: ContrastPreference,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemePreference {
    /// Follow the host.
    #[default]
    System,
    Light,
    Dark,
}

impl SchemePreference {
    /// The scheme to force, if any.
    #[must_use]
    pub const fn forced(self) -> Option<ColorScheme> {
        match self {
            Self::System => None,
            Self::Light => Some(ColorScheme::Light),
            Self::Dark => Some(ColorScheme::Dark),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastPreference {
    /// Whatever the host reports.
    #[default]
    Standard,
    /// Always use the stronger color sets.
    More,
}

impl ContrastPreference {
    #[must_use]
    pub const fn forced(self) -> Option<Contrast> {
        match self {
            Self::Standard => None,
            Self::More => Some(Contrast::More),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
        }
    }
}

impl BridgeConfig {
    /// Parse from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Parse from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| ConfigError::io(path, err))?;
        Self::from_toml_str(&content)
    }

    /// Load the file named by `TINT_THEME_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// [`BridgeConfig::from_env`] with a custom environment lookup.
    pub fn from_env_with(get_env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        match get_env(ENV_CONFIG_PATH) {
            Some(path) if !path.trim().is_empty() => {
                tracing::debug!(path = %path.trim(), "loading theme config");
                Self::from_toml_file(path.trim())
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Check every field. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.watch.poll_interval_ms == 0 {
            errors.push("watch.poll_interval_ms must be > 0".into());
        }

        for (name, raw) in &self.overrides {
            if let Err(err) = parse_override(name, raw) {
                errors.push(format!("overrides.{name}: {err}"));
            }
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Overrides resolved against the vocabulary, in name order.
    pub fn resolved_overrides(&self) -> Result<Vec<(ThemeToken, StyleValue)>, ConfigError> {
        self.overrides
            .iter()
            .map(|(name, raw)| parse_override(name, raw))
            .collect()
    }

    /// Standard palette carrying the configured overrides.
    pub fn palette(&self) -> Result<StandardPalette, ConfigError> {
        StandardPalette::new().with_overrides(self.resolved_overrides()?)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.watch.poll_interval_ms)
    }

    /// Apply the appearance and watch settings to a system environment.
    #[must_use]
    pub fn configure(&self, mut environment: SystemEnvironment) -> SystemEnvironment {
        environment = environment.poll_interval(self.poll_interval());
        if let Some(scheme) = self.appearance.scheme.forced() {
            environment = environment.force_scheme(scheme);
        }
        if let Some(contrast) = self.appearance.contrast.forced() {
            environment = environment.force_contrast(contrast);
        }
        environment
    }

    /// A system environment reading the real process environment.
    #[must_use]
    pub fn system_environment(&self) -> SystemEnvironment {
        self.configure(SystemEnvironment::new())
    }
}

fn parse_override(name: &str, raw: &str) -> Result<(ThemeToken, StyleValue), ConfigError> {
    let token = ThemeToken::from_name(name).ok_or_else(|| ConfigError::UnknownToken {
        name: name.to_string(),
    })?;
    let value = StyleValue::parse(token.kind(), raw).ok_or_else(|| ConfigError::InvalidValue {
        token: token.name(),
        value: raw.to_string(),
        expected: token.kind().name(),
    })?;
    Ok((token, value))
}
