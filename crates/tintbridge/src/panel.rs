#![forbid(unsafe_code)]

//! The static content panel: a legacy-shaped consumer.

use serde::Serialize;
use tint_runtime::ScopeStack;
use tint_style::{LegacyConsumer, LegacyTheme, Rgba, ThemeError, render_legacy};

/// Static text panel styled from the nearest legacy theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    text: String,
}

impl Panel {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render against the nearest legacy theme in `scopes`.
    ///
    /// # Errors
    ///
    /// [`ThemeError::MissingLegacyTheme`] outside any legacy adapter.
    pub fn render_in(&self, scopes: &ScopeStack) -> Result<PanelView, ThemeError> {
        render_legacy(scopes, self)
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new("Hello world")
    }
}

/// What a [`Panel`] looks like under one legacy theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub text: String,
    pub background: Rgba,
    pub foreground: Rgba,
    pub border: Rgba,
    pub font_family: String,
    pub font_size_px: f32,
    pub padding_px: f32,
    pub corner_radius_px: f32,
    pub dark: bool,
}

impl PanelView {
    /// Inline CSS for the panel's root element.
    #[must_use]
    pub fn inline_style(&self) -> String {
        format!(
            "background: {}; color: {}; border: 1px solid {}; font-family: {}; \
             font-size: {}px; padding: {}px; border-radius: {}px;",
            self.background,
            self.foreground,
            self.border,
            self.font_family,
            self.font_size_px,
            self.padding_px,
            self.corner_radius_px,
        )
    }
}

impl LegacyConsumer for Panel {
    type Output = PanelView;

    fn render(&self, theme: &LegacyTheme) -> PanelView {
        PanelView {
            text: self.text.clone(),
            background: theme.color.panel_background,
            foreground: theme.color.text,
            border: theme.color.divider,
            font_family: theme.font_family.body.clone(),
            font_size_px: theme.font_size.body,
            padding_px: theme.spacing.m,
            corner_radius_px: theme.radius.medium,
            dark: theme.is_dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tint_style::ThemeVariables;

    #[test]
    fn default_panel_says_hello() {
        assert_eq!(Panel::default().text(), "Hello world");
    }

    #[test]
    fn render_uses_legacy_fields() {
        let theme = LegacyTheme::from_variables(&ThemeVariables::fallback());
        let view = Panel::default().render(&theme);
        assert_eq!(view.background, theme.color.panel_background);
        assert_eq!(view.foreground, theme.color.text);
        assert_eq!(view.padding_px, 12.0);
        assert!(!view.dark);
        let style = view.inline_style();
        assert!(style.starts_with("background: #f8f9fa; color: #1e2029;"));
        assert!(style.contains("padding: 12px;"));
    }

    #[test]
    fn render_outside_adapter_fails() {
        let scopes = ScopeStack::new();
        assert!(matches!(
            Panel::default().render_in(&scopes),
            Err(ThemeError::MissingLegacyTheme)
        ));
    }
}
