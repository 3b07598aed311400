#![forbid(unsafe_code)]

//! The two nested theme wrappers mounted as one unit.
//!
//! A [`Bridge`] is a [`VariableSource`] with a [`LegacyAdapter`] mounted
//! directly inside it. Everything rendered while the bridge is mounted can
//! resolve either theme shape from the scope stack.

use tint_core::{FixedEnvironment, SystemEnvironment, ThemeEnvironment, UnavailableEnvironment};
use tint_runtime::{ReadSignal, ScopeStack};
use tint_style::{
    BridgeConfig, LegacyAdapter, LegacyTheme, Palette, StandardPalette, ThemeError, ThemeVariables,
    VariableSource,
};
use tracing::error;

pub struct Bridge {
    // Declaration order is drop order: the adapter goes first.
    adapter: LegacyAdapter,
    source: VariableSource,
}

impl Bridge {
    /// Mount the variable source, then the legacy adapter inside it.
    pub fn mount<E>(
        scopes: &ScopeStack,
        environment: &E,
        palette: impl Palette + 'static,
    ) -> Result<Self, ThemeError>
    where
        E: ThemeEnvironment + ?Sized,
    {
        let source = VariableSource::mount(scopes, environment, palette);
        let adapter = LegacyAdapter::mount(scopes)?;
        Ok(Self { adapter, source })
    }

    /// Mount against the process environment, configured by `config`.
    pub fn from_config(scopes: &ScopeStack, config: &BridgeConfig) -> Result<Self, ThemeError> {
        Self::from_config_with(scopes, config, SystemEnvironment::new())
    }

    /// [`Bridge::from_config`] over a caller-supplied system environment.
    pub fn from_config_with(
        scopes: &ScopeStack,
        config: &BridgeConfig,
        environment: SystemEnvironment,
    ) -> Result<Self, ThemeError> {
        let (palette, environment) = prepare(config, environment)?;
        Self::mount(scopes, &environment, palette)
    }

    /// Mount a snapshot of the process environment without starting the
    /// watcher. The variables never change after mount.
    pub fn snapshot_from_config(
        scopes: &ScopeStack,
        config: &BridgeConfig,
    ) -> Result<Self, ThemeError> {
        Self::snapshot_from_config_with(scopes, config, SystemEnvironment::new())
    }

    /// [`Bridge::snapshot_from_config`] over a caller-supplied system
    /// environment.
    pub fn snapshot_from_config_with(
        scopes: &ScopeStack,
        config: &BridgeConfig,
        environment: SystemEnvironment,
    ) -> Result<Self, ThemeError> {
        let (palette, environment) = prepare(config, environment)?;
        match environment.query_theme() {
            Ok(descriptor) => Self::mount(scopes, &FixedEnvironment::new(descriptor), palette),
            Err(err) => Self::mount(
                scopes,
                &UnavailableEnvironment::with_reason(err.to_string()),
                palette,
            ),
        }
    }

    /// Apply queued environment changes in one update pass.
    pub fn pump(&mut self) -> usize {
        self.source.pump()
    }

    #[must_use]
    pub fn variables(&self) -> ReadSignal<ThemeVariables> {
        self.source.signal()
    }

    #[must_use]
    pub fn legacy(&self) -> ReadSignal<LegacyTheme> {
        self.adapter.signal()
    }

    #[must_use]
    pub fn source(&self) -> &VariableSource {
        &self.source
    }

    /// Current variables as CSS custom property declarations.
    #[must_use]
    pub fn custom_properties(&self, prefix: &str) -> String {
        self.source.signal().with(|vars| vars.to_custom_properties(prefix))
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.source.is_mounted() && self.adapter.is_mounted()
    }

    /// Tear down in reverse mount order. Idempotent; also runs on drop.
    pub fn unmount(&mut self) {
        self.adapter.unmount();
        self.source.unmount();
    }
}

/// Validate `config` and apply it to `environment`.
fn prepare(
    config: &BridgeConfig,
    environment: SystemEnvironment,
) -> Result<(StandardPalette, SystemEnvironment), ThemeError> {
    let config = config.clone().validated().inspect_err(|err| {
        error!(error = %err, "theme bridge configuration rejected");
    })?;
    let palette = config.palette()?;
    Ok((palette, config.configure(environment)))
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("source", &self.source)
            .field("adapter", &self.adapter)
            .finish()
    }
}
