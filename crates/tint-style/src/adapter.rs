#![forbid(unsafe_code)]

//! The legacy adapter: re-exposes the nearest [`ThemeVariables`] scope as a
//! [`LegacyTheme`] scope.
//!
//! The adapter never talks to the environment. It subscribes to the
//! upstream variable signal, maps every new snapshot through
//! [`LegacyTheme::from_variables`] and replaces its own snapshot only when
//! the mapped value differs, so variable changes that do not touch the
//! legacy shape cause no downstream notification.

use tint_runtime::{Observable, ReadSignal, ScopeGuard, ScopeStack, Subscription};
use tracing::{debug, error, info, trace};

use crate::error::ThemeError;
use crate::legacy::LegacyTheme;
use crate::variables::ThemeVariables;

/// Producer of the [`LegacyTheme`] scope.
pub struct LegacyAdapter {
    theme: Observable<LegacyTheme>,
    upstream: Option<Subscription>,
    scope: Option<ScopeGuard>,
}

impl LegacyAdapter {
    /// Mount under the nearest variable source in `scopes`.
    ///
    /// # Errors
    ///
    /// [`ThemeError::MissingVariableSource`] when no variable source
    /// encloses this point of the tree.
    pub fn mount(scopes: &ScopeStack) -> Result<Self, ThemeError> {
        let Some(upstream) = scopes.lookup::<ReadSignal<ThemeVariables>>() else {
            error!("legacy adapter mounted without an enclosing theme variable source");
            return Err(ThemeError::MissingVariableSource);
        };

        let theme = Observable::new(upstream.with(LegacyTheme::from_variables));
        let sink = theme.clone();
        let subscription = upstream.subscribe(move |vars| {
            let next = LegacyTheme::from_variables(vars);
            if sink.set(next) {
                debug!(version = sink.version(), "legacy theme re-exposed");
            } else {
                trace!("legacy theme unchanged; not re-exposed");
            }
        });
        let scope = scopes.provide(theme.read_only());
        info!(is_dark = theme.with(|t| t.is_dark), "legacy adapter mounted");

        Ok(Self {
            theme,
            upstream: Some(subscription),
            scope: Some(scope),
        })
    }

    /// Read-only handle on the current legacy theme.
    #[must_use]
    pub fn signal(&self) -> ReadSignal<LegacyTheme> {
        self.theme.read_only()
    }

    #[must_use]
    pub fn current(&self) -> LegacyTheme {
        self.theme.get()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.scope.is_some()
    }

    /// Detach from upstream and pop the scope. Idempotent; also runs on drop.
    pub fn unmount(&mut self) {
        if self.scope.take().is_none() {
            return;
        }
        self.upstream = None;
        info!("legacy adapter unmounted");
    }
}

impl Drop for LegacyAdapter {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for LegacyAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegacyAdapter")
            .field("version", &self.theme.version())
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}
