#![forbid(unsafe_code)]

//! The legacy theme shape and its mapping from theme variables.
//!
//! Older UI code reads a fixed, nested record (`theme.color.panelBackground`,
//! `theme.spacing.m`, ...) instead of looking tokens up by name.
//! [`LegacyTheme::from_variables`] is the mapping table between the two
//! shapes. It is pure and total, and it is written as one struct literal so
//! a field added to the legacy shape without a mapping does not compile.
//!
//! Tokens outside [`LegacyTheme::MAPPED_TOKENS`] (motion durations, raised
//! surfaces, line height) have no legacy counterpart; changing only those
//! leaves the mapped value unchanged.

use serde::{Deserialize, Serialize};

use crate::token::ThemeToken;
use crate::value::Rgba;
use crate::variables::ThemeVariables;

/// How far `brandInteracting` moves from brand toward the text color.
pub const BRAND_INTERACTING_MIX: f32 = 0.2;

/// Theme record in the shape legacy consumers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTheme {
    /// `"dark"` or `"light"`.
    pub name: String,
    pub is_dark: bool,
    pub color: LegacyColors,
    pub font_family: LegacyFontFamily,
    pub font_size: LegacyFontSize,
    pub spacing: LegacySpacing,
    pub radius: LegacyRadius,
    pub box_shadow: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyColors {
    pub background: Rgba,
    pub panel_background: Rgba,
    pub text: Rgba,
    pub secondary_text: Rgba,
    pub disabled_text: Rgba,
    pub divider: Rgba,
    pub brand: Rgba,
    pub brand_interacting: Rgba,
    pub focus_border: Rgba,
    pub success: Rgba,
    pub warn: Rgba,
    pub error: Rgba,
    pub link: Rgba,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyFontFamily {
    pub body: String,
    pub heading: String,
}

/// Font sizes in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyFontSize {
    pub body: f32,
    pub heading: f32,
}

/// Spacing scale in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacySpacing {
    pub xs: f32,
    pub s: f32,
    pub m: f32,
    pub l: f32,
    pub xl: f32,
}

/// Corner radii in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyRadius {
    pub small: f32,
    pub medium: f32,
    pub large: f32,
}

impl LegacyTheme {
    /// Tokens read by [`LegacyTheme::from_variables`].
    pub const MAPPED_TOKENS: [ThemeToken; 25] = [
        ThemeToken::ColorBackground,
        ThemeToken::ColorSurface,
        ThemeToken::ColorText,
        ThemeToken::ColorTextSecondary,
        ThemeToken::ColorTextDisabled,
        ThemeToken::ColorDivider,
        ThemeToken::ColorBrand,
        ThemeToken::ColorFocus,
        ThemeToken::ColorSuccess,
        ThemeToken::ColorWarning,
        ThemeToken::ColorError,
        ThemeToken::ColorLink,
        ThemeToken::FontFamilyBody,
        ThemeToken::FontFamilyHeading,
        ThemeToken::FontSizeBody,
        ThemeToken::FontSizeHeading,
        ThemeToken::SpacingXs,
        ThemeToken::SpacingS,
        ThemeToken::SpacingM,
        ThemeToken::SpacingL,
        ThemeToken::SpacingXl,
        ThemeToken::RadiusSmall,
        ThemeToken::RadiusMedium,
        ThemeToken::RadiusLarge,
        ThemeToken::ShadowElevated,
    ];

    /// The mapping table.
    #[must_use]
    pub fn from_variables(vars: &ThemeVariables) -> Self {
        let background = vars.color(ThemeToken::ColorBackground);
        let text = vars.color(ThemeToken::ColorText);
        let brand = vars.color(ThemeToken::ColorBrand);
        let is_dark = background.relative_luminance() < 0.5;

        Self {
            name: if is_dark { "dark" } else { "light" }.to_string(),
            is_dark,
            color: LegacyColors {
                background,
                panel_background: vars.color(ThemeToken::ColorSurface),
                text,
                secondary_text: vars.color(ThemeToken::ColorTextSecondary),
                disabled_text: vars.color(ThemeToken::ColorTextDisabled),
                divider: vars.color(ThemeToken::ColorDivider),
                brand,
                brand_interacting: brand.mix(text, BRAND_INTERACTING_MIX),
                focus_border: vars.color(ThemeToken::ColorFocus),
                success: vars.color(ThemeToken::ColorSuccess),
                warn: vars.color(ThemeToken::ColorWarning),
                error: vars.color(ThemeToken::ColorError),
                link: vars.color(ThemeToken::ColorLink),
            },
            font_family: LegacyFontFamily {
                body: vars.text(ThemeToken::FontFamilyBody).to_string(),
                heading: vars.text(ThemeToken::FontFamilyHeading).to_string(),
            },
            font_size: LegacyFontSize {
                body: vars.length(ThemeToken::FontSizeBody),
                heading: vars.length(ThemeToken::FontSizeHeading),
            },
            spacing: LegacySpacing {
                xs: vars.length(ThemeToken::SpacingXs),
                s: vars.length(ThemeToken::SpacingS),
                m: vars.length(ThemeToken::SpacingM),
                l: vars.length(ThemeToken::SpacingL),
                xl: vars.length(ThemeToken::SpacingXl),
            },
            radius: LegacyRadius {
                small: vars.length(ThemeToken::RadiusSmall),
                medium: vars.length(ThemeToken::RadiusMedium),
                large: vars.length(ThemeToken::RadiusLarge),
            },
            box_shadow: vars.text(ThemeToken::ShadowElevated).to_string(),
        }
    }

    /// Serialize to the JSON object legacy code consumes.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl From<&ThemeVariables> for LegacyTheme {
    fn from(vars: &ThemeVariables) -> Self {
        Self::from_variables(vars)
    }
}
