#![forbid(unsafe_code)]

//! tintbridge public facade crate.
//!
//! Computes theme variables from the host environment and exposes them to
//! descendant UI elements in two shapes: a token-keyed [`ThemeVariables`]
//! snapshot and a [`LegacyTheme`] record for older UI code. This crate
//! re-exports the common types from the internal crates and mounts both
//! theme scopes together as a [`Bridge`].
//!
//! ```
//! use tintbridge::prelude::*;
//!
//! let scopes = ScopeStack::new();
//! let host = HostEnvironment::new(EnvDescriptor::new(ColorScheme::Dark));
//! let mut bridge = Bridge::mount(&scopes, &host, StandardPalette::new()).unwrap();
//!
//! let view = Panel::default().render_in(&scopes).unwrap();
//! assert!(view.dark);
//!
//! host.push(EnvDescriptor::new(ColorScheme::Light));
//! bridge.pump();
//! assert!(!Panel::default().render_in(&scopes).unwrap().dark);
//! ```

pub mod bridge;
pub mod logging;
pub mod panel;

pub use bridge::Bridge;
pub use logging::init_tracing;
pub use panel::{Panel, PanelView};

// --- Core re-exports -------------------------------------------------------

pub use tint_core::{
    ColorScheme, Contrast, EnvDescriptor, EnvironmentError, FixedEnvironment, HostEnvironment,
    SystemEnvironment, ThemeEnvironment, UnavailableEnvironment, Unsubscribe,
};

// --- Runtime re-exports ----------------------------------------------------

pub use tint_runtime::{Observable, ReadSignal, ScopeGuard, ScopeStack, Subscription, UpdatePass};

// --- Style re-exports ------------------------------------------------------

pub use tint_style::{
    BridgeConfig, ConfigError, LegacyAdapter, LegacyConsumer, LegacyTheme, Palette, Rgba,
    StandardPalette, StyleValue, ThemeError, ThemeToken, ThemeVariables, TokenKind,
    VariableSource, legacy_theme, require_legacy_theme, theme_variables,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Bridge, BridgeConfig, ColorScheme, Contrast, EnvDescriptor, HostEnvironment,
        LegacyConsumer, LegacyTheme, Panel, PanelView, ReadSignal, ScopeStack, StandardPalette,
        SystemEnvironment, ThemeError, ThemeToken, ThemeVariables, legacy_theme, theme_variables,
    };

    pub use crate::{core, runtime, style};
}

pub use tint_core as core;
pub use tint_runtime as runtime;
pub use tint_style as style;
