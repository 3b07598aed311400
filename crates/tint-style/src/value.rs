#![forbid(unsafe_code)]

//! Style values: colors, lengths, durations, numbers and text.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::token::TokenKind;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from `0xRRGGBB`.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse `#RGB`, `#RRGGBB`, `#RRGGBBAA`, `rgb(r, g, b)` or
    /// `rgba(r, g, b, a)` with `a` in `0.0..=1.0`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.is_ascii() {
                return None;
            }
            let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
            return match hex.len() {
                3 => Some(Self::rgb(
                    channel(0..1)? * 17,
                    channel(1..2)? * 17,
                    channel(2..3)? * 17,
                )),
                6 => Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
                8 => Some(Self::rgba(
                    channel(0..2)?,
                    channel(2..4)?,
                    channel(4..6)?,
                    channel(6..8)?,
                )),
                _ => None,
            };
        }

        let lower = trimmed.to_ascii_lowercase();
        if let Some(inner) = lower
            .strip_prefix("rgba(")
            .and_then(|s| s.strip_suffix(')'))
        {
            let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
            let [r, g, b, a] = parts.as_slice() else {
                return None;
            };
            let alpha = a.parse::<f32>().ok().filter(|a| (0.0..=1.0).contains(a))?;
            return Some(Self::rgba(
                r.parse().ok()?,
                g.parse().ok()?,
                b.parse().ok()?,
                (alpha * 255.0).round() as u8,
            ));
        }
        if let Some(inner) = lower.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
            let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
            let [r, g, b] = parts.as_slice() else {
                return None;
            };
            return Some(Self::rgb(r.parse().ok()?, g.parse().ok()?, b.parse().ok()?));
        }
        None
    }

    /// `#rrggbb` for opaque colors, `#rrggbbaa` otherwise.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// CSS color text.
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a == 255 {
            self.to_hex()
        } else {
            let alpha = f32::from(self.a) / 255.0;
            format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, alpha)
        }
    }

    /// WCAG 2.x relative luminance in `0.0..=1.0` (alpha ignored).
    #[must_use]
    pub fn relative_luminance(self) -> f64 {
        fn to_linear(c: u8) -> f64 {
            let s = f64::from(c) / 255.0;
            if s <= 0.04045 {
                s / 12.92
            } else {
                ((s + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * to_linear(self.r) + 0.7152 * to_linear(self.g) + 0.0722 * to_linear(self.b)
    }

    /// WCAG contrast ratio between two colors (1.0 to 21.0).
    #[must_use]
    pub fn contrast_ratio(self, other: Rgba) -> f64 {
        let a = self.relative_luminance();
        let b = other.relative_luminance();
        let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
        (lighter + 0.05) / (darker + 0.05)
    }

    /// Linear blend toward `other`; `t` is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn mix(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let inv = 1.0 - t;
        let blend = |a: u8, b: u8| (f32::from(a) * inv + f32::from(b) * t).round().clamp(0.0, 255.0) as u8;
        Rgba::rgba(
            blend(self.r, other.r),
            blend(self.g, other.g),
            blend(self.b, other.b),
            blend(self.a, other.a),
        )
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Rgba::parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid color `{raw}`")))
    }
}

/// A concrete value for one theme token.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Color(Rgba),
    /// Pixels.
    Length(f32),
    /// Milliseconds.
    Duration(u32),
    Number(f32),
    /// Font stacks and shadows.
    Text(String),
}

impl StyleValue {
    /// Parse `raw` as a value of the given kind.
    ///
    /// Lengths accept an optional `px` suffix and durations an optional `ms`
    /// (or `s`) suffix. Non-finite and negative numbers are rejected.
    #[must_use]
    pub fn parse(kind: TokenKind, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match kind {
            TokenKind::Color => Rgba::parse(raw).map(Self::Color),
            TokenKind::Length => parse_non_negative(raw.strip_suffix("px").unwrap_or(raw))
                .map(Self::Length),
            TokenKind::Duration => {
                if let Some(ms) = raw.strip_suffix("ms") {
                    ms.trim().parse::<u32>().ok().map(Self::Duration)
                } else if let Some(secs) = raw.strip_suffix('s') {
                    parse_non_negative(secs)
                        .map(|s| (s * 1000.0).round())
                        .filter(|ms| *ms <= u32::MAX as f32)
                        .map(|ms| Self::Duration(ms as u32))
                } else {
                    raw.parse::<u32>().ok().map(Self::Duration)
                }
            }
            TokenKind::Number => parse_non_negative(raw).map(Self::Number),
            TokenKind::FontFamily | TokenKind::Shadow => {
                (!raw.is_empty()).then(|| Self::Text(raw.to_string()))
            }
        }
    }

    /// Whether this value has the shape `kind` expects.
    #[must_use]
    pub fn matches_kind(&self, kind: TokenKind) -> bool {
        matches!(
            (self, kind),
            (Self::Color(_), TokenKind::Color)
                | (Self::Length(_), TokenKind::Length)
                | (Self::Duration(_), TokenKind::Duration)
                | (Self::Number(_), TokenKind::Number)
                | (Self::Text(_), TokenKind::FontFamily | TokenKind::Shadow)
        )
    }

    /// CSS text for this value.
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Color(color) => color.to_css(),
            Self::Length(px) => format!("{}px", trim_float(*px)),
            Self::Duration(ms) => format!("{ms}ms"),
            Self::Number(n) => trim_float(*n),
            Self::Text(text) => text.clone(),
        }
    }

    #[must_use]
    pub fn as_color(&self) -> Option<Rgba> {
        match self {
            Self::Color(color) => Some(*color),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_length(&self) -> Option<f32> {
        match self {
            Self::Length(px) => Some(*px),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_duration_ms(&self) -> Option<u32> {
        match self {
            Self::Duration(ms) => Some(*ms),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl std::fmt::Display for StyleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_css())
    }
}

fn parse_non_negative(raw: &str) -> Option<f32> {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// `14.0` → `"14"`, `1.5` → `"1.5"`.
fn trim_float(value: f32) -> String {
    let text = format!("{value:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Rgba::parse("#fb542b"), Some(Rgba::from_hex(0xfb542b)));
        assert_eq!(Rgba::parse("#FFF"), Some(Rgba::WHITE));
        assert_eq!(Rgba::parse("#00000080"), Some(Rgba::rgba(0, 0, 0, 128)));
        assert_eq!(Rgba::parse("#12345"), None);
        assert_eq!(Rgba::parse("#gggggg"), None);
        assert_eq!(Rgba::parse("#ééé"), None);
    }

    #[test]
    fn parses_functional_forms() {
        assert_eq!(Rgba::parse("rgb(10, 20, 30)"), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(
            Rgba::parse("RGBA(0, 0, 0, 0.5)"),
            Some(Rgba::rgba(0, 0, 0, 128))
        );
        assert_eq!(Rgba::parse("rgba(0, 0, 0, 2)"), None);
        assert_eq!(Rgba::parse("rgb(256, 0, 0)"), None);
        assert_eq!(Rgba::parse("hsl(0, 0%, 0%)"), None);
    }

    #[test]
    fn css_text() {
        assert_eq!(Rgba::from_hex(0x1e2029).to_css(), "#1e2029");
        assert_eq!(Rgba::rgba(0, 0, 0, 51).to_css(), "rgba(0, 0, 0, 0.200)");
        assert_eq!(StyleValue::Length(14.0).to_css(), "14px");
        assert_eq!(StyleValue::Length(17.5).to_css(), "17.5px");
        assert_eq!(StyleValue::Number(1.5).to_css(), "1.5");
        assert_eq!(StyleValue::Duration(0).to_css(), "0ms");
    }

    #[test]
    fn luminance_extremes() {
        assert!((Rgba::WHITE.relative_luminance() - 1.0).abs() < 1e-9);
        assert!(Rgba::BLACK.relative_luminance().abs() < 1e-9);
        assert!((Rgba::WHITE.contrast_ratio(Rgba::BLACK) - 21.0).abs() < 1e-6);
    }

    #[test]
    fn mix_endpoints_and_midpoint() {
        let a = Rgba::rgb(0, 0, 0);
        let b = Rgba::rgb(200, 100, 50);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
        assert_eq!(a.mix(b, 0.5), Rgba::rgb(100, 50, 25));
        assert_eq!(a.mix(b, 7.0), b);
    }

    #[test]
    fn style_value_parse_by_kind() {
        assert_eq!(
            StyleValue::parse(TokenKind::Length, "12px"),
            Some(StyleValue::Length(12.0))
        );
        assert_eq!(
            StyleValue::parse(TokenKind::Length, "8"),
            Some(StyleValue::Length(8.0))
        );
        assert_eq!(StyleValue::parse(TokenKind::Length, "-1px"), None);
        assert_eq!(StyleValue::parse(TokenKind::Length, "NaN"), None);
        assert_eq!(
            StyleValue::parse(TokenKind::Duration, "150ms"),
            Some(StyleValue::Duration(150))
        );
        assert_eq!(
            StyleValue::parse(TokenKind::Duration, "0.25s"),
            Some(StyleValue::Duration(250))
        );
        assert_eq!(StyleValue::parse(TokenKind::Duration, "fast"), None);
        assert_eq!(StyleValue::parse(TokenKind::FontFamily, "  "), None);
        assert_eq!(
            StyleValue::parse(TokenKind::Shadow, "none"),
            Some(StyleValue::Text("none".into()))
        );
        assert_eq!(StyleValue::parse(TokenKind::Color, "12px"), None);
    }

    #[test]
    fn kind_matching() {
        assert!(StyleValue::Color(Rgba::WHITE).matches_kind(TokenKind::Color));
        assert!(StyleValue::Text("Inter".into()).matches_kind(TokenKind::FontFamily));
        assert!(!StyleValue::Length(1.0).matches_kind(TokenKind::Number));
    }

    #[test]
    fn rgba_serde_uses_css_text() {
        let json = serde_json::to_string(&Rgba::from_hex(0xfb542b)).unwrap();
        assert_eq!(json, "\"#fb542b\"");
        let back: Rgba = serde_json::from_str("\"rgb(251, 84, 43)\"").unwrap();
        assert_eq!(back, Rgba::from_hex(0xfb542b));
        assert!(serde_json::from_str::<Rgba>("\"nope\"").is_err());
    }

    proptest::proptest! {
        #[test]
        fn hex_text_parses_back(r in 0u8.., g in 0u8.., b in 0u8.., a in 0u8..) {
            let color = Rgba::rgba(r, g, b, a);
            proptest::prop_assert_eq!(Rgba::parse(&color.to_hex()), Some(color));
        }
    }
}
