#![forbid(unsafe_code)]

//! The host-environment capability consumed by the theme bridge.
//!
//! The bridge never talks to a platform API directly. It sees the host as a
//! [`ThemeEnvironment`]: one query for the current appearance and one
//! subscribe/unsubscribe pair for change notifications.
//!
//! # Threading
//!
//! Callbacks may be invoked from any thread (a watcher thread, a host IPC
//! thread). They must only enqueue work; the UI thread processes it on its
//! next update pass.
//!
//! # Unsubscribe contract
//!
//! [`Unsubscribe`] runs its detach action exactly once, either through
//! [`Unsubscribe::cancel`] or when dropped. After it returns, the environment
//! must not invoke the callback again.

use std::sync::Arc;

use crate::appearance::EnvDescriptor;
use crate::error::{EnvironmentError, Result};

/// Callback fired with the new descriptor after every appearance change.
pub type ChangeCallback = Box<dyn Fn(&EnvDescriptor) + Send + Sync + 'static>;

/// Abstract host capability: `query_theme()` and `subscribe(on_change)`.
pub trait ThemeEnvironment {
    /// Query the current appearance.
    fn query_theme(&self) -> Result<EnvDescriptor>;

    /// Attach a change callback. The returned guard detaches it.
    fn subscribe(&self, on_change: ChangeCallback) -> Result<Unsubscribe>;
}

impl<T: ThemeEnvironment + ?Sized> ThemeEnvironment for Arc<T> {
    fn query_theme(&self) -> Result<EnvDescriptor> {
        (**self).query_theme()
    }

    fn subscribe(&self, on_change: ChangeCallback) -> Result<Unsubscribe> {
        (**self).subscribe(on_change)
    }
}

impl<T: ThemeEnvironment + ?Sized> ThemeEnvironment for &T {
    fn query_theme(&self) -> Result<EnvDescriptor> {
        (**self).query_theme()
    }

    fn subscribe(&self, on_change: ChangeCallback) -> Result<Unsubscribe> {
        (**self).subscribe(on_change)
    }
}

/// RAII guard that detaches an environment subscription exactly once.
#[must_use = "dropping an Unsubscribe detaches the callback immediately"]
pub struct Unsubscribe {
    detach: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl Unsubscribe {
    /// Wrap a detach action.
    pub fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// A guard with nothing to detach (environments without live updates).
    pub fn noop() -> Self {
        Self { detach: None }
    }

    /// Detach now.
    pub fn cancel(mut self) {
        self.run();
    }

    /// Whether the detach action has not run yet.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.detach.is_some()
    }

    fn run(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Unsubscribe {
    fn drop(&mut self) {
        self.run();
    }
}

impl std::fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// An environment with no appearance API (headless hosts, old platforms).
///
/// Every call fails with [`EnvironmentError::Unsupported`].
#[derive(Debug, Clone, Default)]
pub struct UnavailableEnvironment {
    reason: Option<String>,
}

impl UnavailableEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }

    fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or("host exposes no appearance API")
    }
}

impl ThemeEnvironment for UnavailableEnvironment {
    fn query_theme(&self) -> Result<EnvDescriptor> {
        Err(EnvironmentError::unsupported(self.reason()))
    }

    fn subscribe(&self, _on_change: ChangeCallback) -> Result<Unsubscribe> {
        Err(EnvironmentError::unsupported(self.reason()))
    }
}

/// An environment whose appearance never changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedEnvironment {
    descriptor: EnvDescriptor,
}

impl FixedEnvironment {
    #[must_use]
    pub const fn new(descriptor: EnvDescriptor) -> Self {
        Self { descriptor }
    }
}

impl ThemeEnvironment for FixedEnvironment {
    fn query_theme(&self) -> Result<EnvDescriptor> {
        Ok(self.descriptor)
    }

    fn subscribe(&self, _on_change: ChangeCallback) -> Result<Unsubscribe> {
        Ok(Unsubscribe::noop())
    }
}
