#![forbid(unsafe_code)]

//! Consumer-side lookups.
//!
//! Descendant UI elements resolve the nearest enclosing theme scope and get
//! a read-only signal back. There is no way to write a theme from here.

use tint_runtime::{ReadSignal, ScopeStack};
use tracing::error;

use crate::error::ThemeError;
use crate::legacy::LegacyTheme;
use crate::variables::ThemeVariables;

/// Nearest enclosing [`ThemeVariables`] scope.
#[must_use]
pub fn theme_variables(scopes: &ScopeStack) -> Option<ReadSignal<ThemeVariables>> {
    scopes.lookup()
}

/// Nearest enclosing [`LegacyTheme`] scope.
#[must_use]
pub fn legacy_theme(scopes: &ScopeStack) -> Option<ReadSignal<LegacyTheme>> {
    scopes.lookup()
}

/// Like [`theme_variables`], failing when no source encloses the caller.
pub fn require_theme_variables(scopes: &ScopeStack) -> Result<ReadSignal<ThemeVariables>, ThemeError> {
    theme_variables(scopes).ok_or_else(|| {
        error!("theme consumer rendered outside any theme variable source");
        ThemeError::MissingVariableSource
    })
}

/// Like [`legacy_theme`], failing when no adapter encloses the caller.
pub fn require_legacy_theme(scopes: &ScopeStack) -> Result<ReadSignal<LegacyTheme>, ThemeError> {
    legacy_theme(scopes).ok_or_else(|| {
        error!("legacy consumer rendered outside any legacy adapter");
        ThemeError::MissingLegacyTheme
    })
}

/// A UI element that renders from the legacy theme shape.
pub trait LegacyConsumer {
    type Output;

    fn render(&self, theme: &LegacyTheme) -> Self::Output;
}

/// Render `consumer` against the nearest legacy theme.
pub fn render_legacy<C: LegacyConsumer>(
    scopes: &ScopeStack,
    consumer: &C,
) -> Result<C::Output, ThemeError> {
    Ok(require_legacy_theme(scopes)?.with(|theme| consumer.render(theme)))
}
