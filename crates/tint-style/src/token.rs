#![forbid(unsafe_code)]

//! The theme token vocabulary.
//!
//! [`ThemeToken`] is the closed, versioned set of names a [`ThemeVariables`]
//! snapshot is keyed by. Adding or removing a token is a vocabulary change
//! and bumps [`VOCABULARY_VERSION`].
//!
//! Names are stable kebab-case strings (`color-background`, `spacing-m`) so
//! they can be used as CSS custom property suffixes and as config keys.
//!
//! [`ThemeVariables`]: crate::variables::ThemeVariables

use std::sync::OnceLock;

use ahash::AHashMap;

/// Version of the token vocabulary.
pub const VOCABULARY_VERSION: u32 = 1;

/// Value shape expected for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Color,
    /// Pixel length.
    Length,
    /// Milliseconds.
    Duration,
    /// Unitless number.
    Number,
    FontFamily,
    Shadow,
}

impl TokenKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Length => "length",
            Self::Duration => "duration",
            Self::Number => "number",
            Self::FontFamily => "font family",
            Self::Shadow => "shadow",
        }
    }
}

/// A named visual-style variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThemeToken {
    ColorBackground,
    ColorSurface,
    ColorSurfaceRaised,
    ColorText,
    ColorTextSecondary,
    ColorTextDisabled,
    ColorDivider,
    ColorBrand,
    ColorFocus,
    ColorSuccess,
    ColorWarning,
    ColorError,
    ColorLink,
    FontFamilyBody,
    FontFamilyHeading,
    FontSizeBody,
    FontSizeHeading,
    LineHeightBody,
    SpacingXs,
    SpacingS,
    SpacingM,
    SpacingL,
    SpacingXl,
    RadiusSmall,
    RadiusMedium,
    RadiusLarge,
    ShadowElevated,
    MotionDurationFast,
    MotionDurationSlow,
}

impl ThemeToken {
    /// Every token, in index order.
    pub const ALL: [ThemeToken; 29] = [
        ThemeToken::ColorBackground,
        ThemeToken::ColorSurface,
        ThemeToken::ColorSurfaceRaised,
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
        ThemeToken::LineHeightBody,
        ThemeToken::SpacingXs,
        ThemeToken::SpacingS,
        ThemeToken::SpacingM,
        ThemeToken::SpacingL,
        ThemeToken::SpacingXl,
        ThemeToken::RadiusSmall,
        ThemeToken::RadiusMedium,
        ThemeToken::RadiusLarge,
        ThemeToken::ShadowElevated,
        ThemeToken::MotionDurationFast,
        ThemeToken::MotionDurationSlow,
    ];

    /// Number of tokens in the vocabulary.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this token in [`ThemeToken::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable kebab-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ColorBackground => "color-background",
            Self::ColorSurface => "color-surface",
            Self::ColorSurfaceRaised => "color-surface-raised",
            Self::ColorText => "color-text",
            Self::ColorTextSecondary => "color-text-secondary",
            Self::ColorTextDisabled => "color-text-disabled",
            Self::ColorDivider => "color-divider",
            Self::ColorBrand => "color-brand",
            Self::ColorFocus => "color-focus",
            Self::ColorSuccess => "color-success",
            Self::ColorWarning => "color-warning",
            Self::ColorError => "color-error",
            Self::ColorLink => "color-link",
            Self::FontFamilyBody => "font-family-body",
            Self::FontFamilyHeading => "font-family-heading",
            Self::FontSizeBody => "font-size-body",
            Self::FontSizeHeading => "font-size-heading",
            Self::LineHeightBody => "line-height-body",
            Self::SpacingXs => "spacing-xs",
            Self::SpacingS => "spacing-s",
            Self::SpacingM => "spacing-m",
            Self::SpacingL => "spacing-l",
            Self::SpacingXl => "spacing-xl",
            Self::RadiusSmall => "radius-small",
            Self::RadiusMedium => "radius-medium",
            Self::RadiusLarge => "radius-large",
            Self::ShadowElevated => "shadow-elevated",
            Self::MotionDurationFast => "motion-duration-fast",
            Self::MotionDurationSlow => "motion-duration-slow",
        }
    }

    #[must_use]
    pub const fn kind(self) -> TokenKind {
        match self {
            Self::ColorBackground
            | Self::ColorSurface
            | Self::ColorSurfaceRaised
            | Self::ColorText
            | Self::ColorTextSecondary
            | Self::ColorTextDisabled
            | Self::ColorDivider
            | Self::ColorBrand
            | Self::ColorFocus
            | Self::ColorSuccess
            | Self::ColorWarning
            | Self::ColorError
            | Self::ColorLink => TokenKind::Color,
            Self::FontFamilyBody | Self::FontFamilyHeading => TokenKind::FontFamily,
            Self::FontSizeBody
            | Self::FontSizeHeading
            | Self::SpacingXs
            | Self::SpacingS
            | Self::SpacingM
            | Self::SpacingL
            | Self::SpacingXl
            | Self::RadiusSmall
            | Self::RadiusMedium
            | Self::RadiusLarge => TokenKind::Length,
            Self::LineHeightBody => TokenKind::Number,
            Self::ShadowElevated => TokenKind::Shadow,
            Self::MotionDurationFast | Self::MotionDurationSlow => TokenKind::Duration,
        }
    }

    /// Whether the token only affects animation timing.
    #[must_use]
    pub const fn is_motion(self) -> bool {
        matches!(self.kind(), TokenKind::Duration)
    }

    /// Resolve a token by its kebab-case name.
    ///
    /// Unknown names yield `None`; there is no fuzzy matching.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        static BY_NAME: OnceLock<AHashMap<&'static str, ThemeToken>> = OnceLock::new();
        BY_NAME
            .get_or_init(|| Self::ALL.iter().map(|t| (t.name(), *t)).collect())
            .get(name.trim())
            .copied()
    }
}

impl std::fmt::Display for ThemeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_is_in_index_order() {
        for (i, token) in ThemeToken::ALL.iter().enumerate() {
            assert_eq!(token.index(), i, "{token} out of order");
        }
    }

    #[test]
    fn names_are_unique_and_kebab_case() {
        let mut seen = HashSet::new();
        for token in ThemeToken::ALL {
            let name = token.name();
            assert!(seen.insert(name), "duplicate name {name}");
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '-'),
                "{name} is not kebab-case"
            );
        }
        assert_eq!(seen.len(), ThemeToken::COUNT);
    }

    #[test]
    fn from_name_resolves_every_token() {
        for token in ThemeToken::ALL {
            assert_eq!(ThemeToken::from_name(token.name()), Some(token));
        }
        assert_eq!(ThemeToken::from_name(" spacing-m "), Some(ThemeToken::SpacingM));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(ThemeToken::from_name("color-primary"), None);
        assert_eq!(ThemeToken::from_name("Color-Background"), None);
        assert_eq!(ThemeToken::from_name(""), None);
    }

    #[test]
    fn motion_tokens_are_durations() {
        let motion: Vec<_> = ThemeToken::ALL.iter().filter(|t| t.is_motion()).collect();
        assert_eq!(
            motion,
            vec![&ThemeToken::MotionDurationFast, &ThemeToken::MotionDurationSlow]
        );
    }
}
