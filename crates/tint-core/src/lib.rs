#![forbid(unsafe_code)]

//! Core: host appearance detection and the theme-change capability.
//!
//! # Role in tintbridge
//! `tint-core` is the upstream boundary. It describes what the host says
//! about its appearance ([`EnvDescriptor`]) and abstracts how the bridge asks
//! for it ([`ThemeEnvironment`]): one query, one subscribe/unsubscribe pair.
//!
//! # Primary responsibilities
//! - **EnvDescriptor**: color scheme, contrast, reduced motion, text scale.
//! - **ThemeEnvironment**: `query_theme()` / `subscribe(on_change)`.
//! - **Unsubscribe**: RAII detach that runs exactly once.
//! - **Built-in hosts**: [`HostEnvironment`] (pushed), [`SystemEnvironment`]
//!   (environment variables + watcher), [`UnavailableEnvironment`] and
//!   [`FixedEnvironment`].
//!
//! # How it fits in the system
//! `tint-style` mounts a variable source on top of any `ThemeEnvironment`.
//! Nothing in this crate knows about tokens or palettes.

pub mod appearance;
pub mod environment;
pub mod error;
pub mod host;
pub mod system;

pub use appearance::{ColorScheme, Contrast, EnvDescriptor};
pub use environment::{
    ChangeCallback, FixedEnvironment, ThemeEnvironment, UnavailableEnvironment, Unsubscribe,
};
pub use error::EnvironmentError;
pub use host::HostEnvironment;
pub use system::SystemEnvironment;
