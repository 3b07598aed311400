#![forbid(unsafe_code)]

//! Style: theme tokens, snapshots and the two nested theme scopes.
//!
//! # Role in tintbridge
//! `tint-style` turns what the host says about its appearance into values
//! UI elements can use, in two shapes:
//!
//! - [`ThemeVariables`]: token-keyed snapshot, provided by a
//!   [`VariableSource`].
//! - [`LegacyTheme`]: fixed nested record for older UI code, provided by a
//!   [`LegacyAdapter`] mounted inside a variable source.
//!
//! ```text
//! environment ──► VariableSource ──► LegacyAdapter ──► consumers
//! ```
//!
//! # How it fits in the system
//! Environments come from `tint-core`; observables, update passes and
//! scopes from `tint-runtime`. The `tintbridge` facade mounts both scopes
//! together.

pub mod adapter;
pub mod config;
pub mod consumer;
pub mod error;
pub mod legacy;
pub mod palette;
pub mod source;
pub mod token;
pub mod value;
pub mod variables;

pub use adapter::LegacyAdapter;
pub use config::{
    AppearanceConfig, BridgeConfig, ContrastPreference, SchemePreference, WatchConfig,
};
pub use consumer::{
    LegacyConsumer, legacy_theme, render_legacy, require_legacy_theme, require_theme_variables,
    theme_variables,
};
pub use error::{ConfigError, ThemeError};
pub use legacy::{
    LegacyColors, LegacyFontFamily, LegacyFontSize, LegacyRadius, LegacySpacing, LegacyTheme,
};
pub use palette::{Palette, StandardPalette};
pub use source::VariableSource;
pub use token::{ThemeToken, TokenKind, VOCABULARY_VERSION};
pub use value::{Rgba, StyleValue};
pub use variables::ThemeVariables;
