#![forbid(unsafe_code)]

//! Host appearance descriptor and environment-variable detection.
//!
//! [`EnvDescriptor`] is the opaque-to-the-bridge summary of what the host
//! says about its current appearance. Detection is deterministic given an
//! environment lookup, so tests drive it through [`detect_with`] instead of
//! mutating the process environment.
//!
//! # Detection order
//!
//! 1. `TINT_COLOR_SCHEME` (`light` / `dark`)
//! 2. `GTK_THEME` (`Adwaita:dark`, `Yaru-dark`, ...)
//! 3. `COLORFGBG` (`fg;bg`, background palette index)
//!
//! If none of these yields a scheme, detection reports nothing and the caller
//! decides on a fallback.

/// Environment variable forcing the color scheme.
pub const ENV_COLOR_SCHEME: &str = "TINT_COLOR_SCHEME";
/// Environment variable forcing the contrast preference.
pub const ENV_CONTRAST: &str = "TINT_CONTRAST";
/// Environment variable requesting reduced motion (`1/0/true/false`).
pub const ENV_REDUCED_MOTION: &str = "TINT_REDUCED_MOTION";
/// Environment variable with the text scale in percent.
pub const ENV_TEXT_SCALE: &str = "TINT_TEXT_SCALE";

const MIN_TEXT_SCALE: u16 = 50;
const MAX_TEXT_SCALE: u16 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" | "day" => Some(Self::Light),
            "dark" | "night" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Contrast {
    #[default]
    Standard,
    /// The user asked for stronger separation between foreground and background.
    More,
}

impl Contrast {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" | "normal" | "no-preference" => Some(Self::Standard),
            "more" | "high" => Some(Self::More),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::More => "more",
        }
    }
}

/// Snapshot of the host's appearance state.
///
/// Values are replaced wholesale on every change; nothing mutates a
/// descriptor that has been handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvDescriptor {
    pub scheme: ColorScheme,
    pub contrast: Contrast,
    pub reduced_motion: bool,
    /// Text scale in percent; 100 is the platform default.
    pub text_scale_percent: u16,
}

impl Default for EnvDescriptor {
    fn default() -> Self {
        Self {
            scheme: ColorScheme::Light,
            contrast: Contrast::Standard,
            reduced_motion: false,
            text_scale_percent: 100,
        }
    }
}

impl EnvDescriptor {
    #[must_use]
    pub fn new(scheme: ColorScheme) -> Self {
        Self {
            scheme,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_contrast(mut self, contrast: Contrast) -> Self {
        self.contrast = contrast;
        self
    }

    #[must_use]
    pub fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }

    /// Set the text scale, clamped to 50..=300 percent.
    #[must_use]
    pub fn with_text_scale(mut self, percent: u16) -> Self {
        self.text_scale_percent = percent.clamp(MIN_TEXT_SCALE, MAX_TEXT_SCALE);
        self
    }

    /// Text scale as a multiplier (`1.0` at 100%).
    #[must_use]
    pub fn text_scale(&self) -> f32 {
        f32::from(self.text_scale_percent) / 100.0
    }
}

/// Detect the appearance from the process environment.
#[must_use]
pub fn detect() -> Option<EnvDescriptor> {
    detect_with(|key| std::env::var(key).ok())
}

/// Detect the appearance using a custom environment lookup (for tests).
///
/// Returns `None` when no source reports a color scheme.
#[must_use]
pub fn detect_with<F>(get_env: F) -> Option<EnvDescriptor>
where
    F: Fn(&str) -> Option<String>,
{
    let scheme = detect_scheme(&get_env)?;
    let contrast = detect_contrast(&get_env);
    let reduced_motion = get_env(ENV_REDUCED_MOTION)
        .and_then(|value| parse_bool(&value))
        .unwrap_or(false);
    let text_scale_percent = get_env(ENV_TEXT_SCALE)
        .and_then(|value| value.trim().trim_end_matches('%').parse::<u16>().ok())
        .unwrap_or(100)
        .clamp(MIN_TEXT_SCALE, MAX_TEXT_SCALE);

    Some(EnvDescriptor {
        scheme,
        contrast,
        reduced_motion,
        text_scale_percent,
    })
}

fn detect_scheme<F>(get_env: &F) -> Option<ColorScheme>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = get_env(ENV_COLOR_SCHEME)
        && let Some(parsed) = ColorScheme::parse(&value)
    {
        return Some(parsed);
    }

    if let Some(gtk) = get_env("GTK_THEME")
        && !gtk.trim().is_empty()
    {
        let gtk = gtk.to_ascii_lowercase();
        if gtk.ends_with(":dark") || gtk.contains("-dark") {
            return Some(ColorScheme::Dark);
        }
        return Some(ColorScheme::Light);
    }

    // COLORFGBG is "fg;bg" or "fg;default;bg"; the last field is the
    // background palette index.
    let colorfgbg = get_env("COLORFGBG")?;
    let bg = colorfgbg.rsplit(';').next()?.trim().parse::<u8>().ok()?;
    if bg <= 6 || bg == 8 {
        Some(ColorScheme::Dark)
    } else {
        Some(ColorScheme::Light)
    }
}

fn detect_contrast<F>(get_env: &F) -> Contrast
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = get_env(ENV_CONTRAST)
        && let Some(parsed) = Contrast::parse(&value)
    {
        return parsed;
    }
    match get_env("GTK_THEME") {
        Some(gtk) if gtk.to_ascii_lowercase().contains("highcontrast") => Contrast::More,
        _ => Contrast::Standard,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "reduce" => Some(true),
        "0" | "false" | "no" | "off" | "no-preference" => Some(false),
        _ => None,
    }
}
