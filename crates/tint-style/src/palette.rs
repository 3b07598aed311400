#![forbid(unsafe_code)]

//! Palettes: the product-specific seam that turns an environment
//! descriptor into a complete [`ThemeVariables`] snapshot.
//!
//! [`StandardPalette`] ships with light and dark color sets, a stronger
//! variant of each for [`Contrast::More`], zeroed durations for reduced
//! motion and font sizes scaled by the host's text scale. Per-token
//! overrides are applied last.

use ahash::AHashMap;
use tint_core::{ColorScheme, Contrast, EnvDescriptor};

use crate::error::ConfigError;
use crate::token::ThemeToken;
use crate::value::{Rgba, StyleValue};
use crate::variables::ThemeVariables;

/// Resolves a descriptor to a full snapshot.
///
/// Implementations must be deterministic: equal descriptors produce equal
/// snapshots.
pub trait Palette {
    fn resolve(&self, env: &EnvDescriptor) -> ThemeVariables;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Palette for F
where
    F: Fn(&EnvDescriptor) -> ThemeVariables,
{
    fn resolve(&self, env: &EnvDescriptor) -> ThemeVariables {
        self(env)
    }
}

/// Colors for one scheme/contrast combination.
#[derive(Debug, Clone, Copy)]
struct ColorSet {
    background: Rgba,
    surface: Rgba,
    surface_raised: Rgba,
    text: Rgba,
    text_secondary: Rgba,
    text_disabled: Rgba,
    divider: Rgba,
    brand: Rgba,
    focus: Rgba,
    success: Rgba,
    warning: Rgba,
    error: Rgba,
    link: Rgba,
}

const LIGHT: ColorSet = ColorSet {
    background: Rgba::from_hex(0xffffff),
    surface: Rgba::from_hex(0xf8f9fa),
    surface_raised: Rgba::from_hex(0xffffff),
    text: Rgba::from_hex(0x1e2029),
    text_secondary: Rgba::from_hex(0x686978),
    text_disabled: Rgba::from_hex(0xaeb1c2),
    divider: Rgba::from_hex(0xe2e3e7),
    brand: Rgba::from_hex(0xfb542b),
    focus: Rgba::from_hex(0x423eee),
    success: Rgba::from_hex(0x12a378),
    warning: Rgba::from_hex(0xb56b00),
    error: Rgba::from_hex(0xbd1531),
    link: Rgba::from_hex(0x4c54d2),
};

const LIGHT_MORE: ColorSet = ColorSet {
    text: Rgba::from_hex(0x000000),
    text_secondary: Rgba::from_hex(0x3b3e4f),
    text_disabled: Rgba::from_hex(0x6b6e80),
    divider: Rgba::from_hex(0x84889c),
    focus: Rgba::from_hex(0x1f1bbd),
    link: Rgba::from_hex(0x2a2fa8),
    ..LIGHT
};

const DARK: ColorSet = ColorSet {
    background: Rgba::from_hex(0x1e2029),
    surface: Rgba::from_hex(0x282b36),
    surface_raised: Rgba::from_hex(0x343846),
    text: Rgba::from_hex(0xf0f2ff),
    text_secondary: Rgba::from_hex(0xc2c4cf),
    text_disabled: Rgba::from_hex(0x6b6e80),
    divider: Rgba::from_hex(0x3b3e4f),
    brand: Rgba::from_hex(0xfb542b),
    focus: Rgba::from_hex(0x737ade),
    success: Rgba::from_hex(0x58e1b9),
    warning: Rgba::from_hex(0xf4c156),
    error: Rgba::from_hex(0xff7a87),
    link: Rgba::from_hex(0xa0a5eb),
};

const DARK_MORE: ColorSet = ColorSet {
    background: Rgba::from_hex(0x000000),
    text: Rgba::from_hex(0xffffff),
    text_secondary: Rgba::from_hex(0xe2e3e7),
    text_disabled: Rgba::from_hex(0xaeb1c2),
    divider: Rgba::from_hex(0x84889c),
    focus: Rgba::from_hex(0xa0a5eb),
    ..DARK
};

const fn color_set(scheme: ColorScheme, contrast: Contrast) -> &'static ColorSet {
    match (scheme, contrast) {
        (ColorScheme::Light, Contrast::Standard) => &LIGHT,
        (ColorScheme::Light, Contrast::More) => &LIGHT_MORE,
        (ColorScheme::Dark, Contrast::Standard) => &DARK,
        (ColorScheme::Dark, Contrast::More) => &DARK_MORE,
    }
}

const FONT_BODY: &str = "Inter, -apple-system, BlinkMacSystemFont, \"Segoe UI\", sans-serif";
const FONT_HEADING: &str = "Poppins, Inter, sans-serif";
const FONT_SIZE_BODY_PX: f32 = 14.0;
const FONT_SIZE_HEADING_PX: f32 = 20.0;
const MOTION_FAST_MS: u32 = 120;
const MOTION_SLOW_MS: u32 = 300;

/// The built-in palette.
#[derive(Debug, Clone, Default)]
pub struct StandardPalette {
    overrides: AHashMap<ThemeToken, StyleValue>,
}

impl StandardPalette {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `token` to `value` regardless of the environment.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] when `value` does not have the shape
    /// the token expects.
    pub fn with_override(mut self, token: ThemeToken, value: StyleValue) -> Result<Self, ConfigError> {
        if !value.matches_kind(token.kind()) {
            return Err(ConfigError::InvalidValue {
                token: token.name(),
                value: value.to_css(),
                expected: token.kind().name(),
            });
        }
        self.overrides.insert(token, value);
        Ok(self)
    }

    /// Apply a batch of overrides.
    ///
    /// # Errors
    ///
    /// Stops at the first value whose shape does not match its token.
    pub fn with_overrides(
        self,
        overrides: impl IntoIterator<Item = (ThemeToken, StyleValue)>,
    ) -> Result<Self, ConfigError> {
        overrides
            .into_iter()
            .try_fold(self, |palette, (token, value)| palette.with_override(token, value))
    }

    #[must_use]
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    pub(crate) fn base_value(token: ThemeToken, env: &EnvDescriptor) -> StyleValue {
        let colors = color_set(env.scheme, env.contrast);
        let scale = env.text_scale();
        let motion = |ms: u32| StyleValue::Duration(if env.reduced_motion { 0 } else { ms });
        match token {
            ThemeToken::ColorBackground => StyleValue::Color(colors.background),
            ThemeToken::ColorSurface => StyleValue::Color(colors.surface),
            ThemeToken::ColorSurfaceRaised => StyleValue::Color(colors.surface_raised),
            ThemeToken::ColorText => StyleValue::Color(colors.text),
            ThemeToken::ColorTextSecondary => StyleValue::Color(colors.text_secondary),
            ThemeToken::ColorTextDisabled => StyleValue::Color(colors.text_disabled),
            ThemeToken::ColorDivider => StyleValue::Color(colors.divider),
            ThemeToken::ColorBrand => StyleValue::Color(colors.brand),
            ThemeToken::ColorFocus => StyleValue::Color(colors.focus),
            ThemeToken::ColorSuccess => StyleValue::Color(colors.success),
            ThemeToken::ColorWarning => StyleValue::Color(colors.warning),
            ThemeToken::ColorError => StyleValue::Color(colors.error),
            ThemeToken::ColorLink => StyleValue::Color(colors.link),
            ThemeToken::FontFamilyBody => StyleValue::Text(FONT_BODY.to_string()),
            ThemeToken::FontFamilyHeading => StyleValue::Text(FONT_HEADING.to_string()),
            ThemeToken::FontSizeBody => StyleValue::Length(FONT_SIZE_BODY_PX * scale),
            ThemeToken::FontSizeHeading => StyleValue::Length(FONT_SIZE_HEADING_PX * scale),
            ThemeToken::LineHeightBody => StyleValue::Number(1.5),
            ThemeToken::SpacingXs => StyleValue::Length(4.0),
            ThemeToken::SpacingS => StyleValue::Length(8.0),
            ThemeToken::SpacingM => StyleValue::Length(12.0),
            ThemeToken::SpacingL => StyleValue::Length(16.0),
            ThemeToken::SpacingXl => StyleValue::Length(24.0),
            ThemeToken::RadiusSmall => StyleValue::Length(4.0),
            ThemeToken::RadiusMedium => StyleValue::Length(8.0),
            ThemeToken::RadiusLarge => StyleValue::Length(16.0),
            ThemeToken::ShadowElevated => StyleValue::Text(
                match env.scheme {
                    ColorScheme::Light => "0 1px 4px rgba(0, 0, 0, 0.12)",
                    ColorScheme::Dark => "0 1px 4px rgba(0, 0, 0, 0.5)",
                }
                .to_string(),
            ),
            ThemeToken::MotionDurationFast => motion(MOTION_FAST_MS),
            ThemeToken::MotionDurationSlow => motion(MOTION_SLOW_MS),
        }
    }
}

impl Palette for StandardPalette {
    fn resolve(&self, env: &EnvDescriptor) -> ThemeVariables {
        ThemeVariables::from_fn(|token| match self.overrides.get(&token) {
            Some(value) => value.clone(),
            None => Self::base_value(token, env),
        })
    }

    fn name(&self) -> &str {
        "standard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_descriptors() -> Vec<EnvDescriptor> {
        let mut out = Vec::new();
        for scheme in [ColorScheme::Light, ColorScheme::Dark] {
            for contrast in [Contrast::Standard, Contrast::More] {
                for reduced in [false, true] {
                    out.push(
                        EnvDescriptor::new(scheme)
                            .with_contrast(contrast)
                            .with_reduced_motion(reduced),
                    );
                }
            }
        }
        out
    }

    #[test]
    fn background_luminance_matches_scheme() {
        let palette = StandardPalette::new();
        for env in all_descriptors() {
            let bg = palette.resolve(&env).color(ThemeToken::ColorBackground);
            assert_eq!(bg.relative_luminance() < 0.5, env.scheme.is_dark(), "{env:?}");
        }
    }

    #[test]
    fn body_text_meets_wcag_aa() {
        let palette = StandardPalette::new();
        for env in all_descriptors() {
            let vars = palette.resolve(&env);
            let ratio = vars
                .color(ThemeToken::ColorText)
                .contrast_ratio(vars.color(ThemeToken::ColorBackground));
            assert!(ratio >= 4.5, "{env:?}: {ratio}");
        }
    }

    #[test]
    fn more_contrast_increases_text_contrast() {
        let palette = StandardPalette::new();
        for scheme in [ColorScheme::Light, ColorScheme::Dark] {
            let ratio = |contrast| {
                let vars = palette.resolve(&EnvDescriptor::new(scheme).with_contrast(contrast));
                vars.color(ThemeToken::ColorText)
                    .contrast_ratio(vars.color(ThemeToken::ColorBackground))
            };
            assert!(ratio(Contrast::More) > ratio(Contrast::Standard), "{scheme:?}");
        }
    }

    #[test]
    fn reduced_motion_zeroes_durations_only() {
        let palette = StandardPalette::new();
        let full = palette.resolve(&EnvDescriptor::default());
        let reduced = palette.resolve(&EnvDescriptor::default().with_reduced_motion(true));
        let changed = full.diff(&reduced);
        assert_eq!(
            changed,
            vec![ThemeToken::MotionDurationFast, ThemeToken::MotionDurationSlow]
        );
        assert_eq!(
            reduced.get(ThemeToken::MotionDurationSlow),
            &StyleValue::Duration(0)
        );
    }

    #[test]
    fn text_scale_scales_font_sizes() {
        let palette = StandardPalette::new();
        let vars = palette.resolve(&EnvDescriptor::default().with_text_scale(150));
        assert_eq!(vars.length(ThemeToken::FontSizeBody), 21.0);
        assert_eq!(vars.length(ThemeToken::FontSizeHeading), 30.0);
        assert_eq!(vars.length(ThemeToken::SpacingM), 12.0);
    }

    #[test]
    fn overrides_win_over_environment() {
        let brand = StyleValue::Color(Rgba::from_hex(0x339af0));
        let palette = StandardPalette::new()
            .with_override(ThemeToken::ColorBrand, brand.clone())
            .unwrap();
        assert_eq!(palette.override_count(), 1);
        for env in all_descriptors() {
            assert_eq!(palette.resolve(&env).get(ThemeToken::ColorBrand), &brand);
        }
    }

    #[test]
    fn override_kind_mismatch_is_rejected() {
        let err = StandardPalette::new()
            .with_override(ThemeToken::SpacingM, StyleValue::Color(Rgba::WHITE))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { token: "spacing-m", expected: "length", .. }
        ));
    }

    #[test]
    fn closures_are_palettes() {
        let fixed = |_: &EnvDescriptor| ThemeVariables::fallback();
        assert_eq!(fixed.resolve(&EnvDescriptor::new(ColorScheme::Dark)), ThemeVariables::fallback());
        assert_eq!(Palette::name(&fixed), "custom");
        let boxed: Box<dyn Palette> = Box::new(StandardPalette::new());
        assert_eq!(boxed.name(), "standard");
    }
}
