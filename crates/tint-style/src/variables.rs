#![forbid(unsafe_code)]

//! Immutable theme-variable snapshots.
//!
//! # Invariants
//!
//! 1. A [`ThemeVariables`] holds exactly one value per [`ThemeToken`]: the
//!    only constructor, [`ThemeVariables::from_fn`], is total over the
//!    vocabulary.
//! 2. Snapshots are never mutated. Producers build a new one and replace the
//!    old one wholesale.
//! 3. Equality is by value; clones share storage.

use std::collections::BTreeMap;
use std::sync::Arc;

use tint_core::EnvDescriptor;
use tracing::warn;

use crate::palette::{Palette, StandardPalette};
use crate::token::ThemeToken;
use crate::value::{Rgba, StyleValue};

/// One complete set of theme variables.
#[derive(Clone)]
pub struct ThemeVariables {
    values: Arc<[StyleValue]>,
}

impl ThemeVariables {
    /// Build a snapshot by asking `value_for` for every token.
    ///
    /// A value of the wrong kind is replaced by the token's fallback value
    /// and logged at `warn`.
    pub fn from_fn(mut value_for: impl FnMut(ThemeToken) -> StyleValue) -> Self {
        let values: Vec<StyleValue> = ThemeToken::ALL
            .iter()
            .map(|&token| {
                let value = value_for(token);
                if value.matches_kind(token.kind()) {
                    return value;
                }
                warn!(
                    token = token.name(),
                    expected = token.kind().name(),
                    got = %value,
                    "value of the wrong kind; using the fallback value"
                );
                StandardPalette::base_value(token, &EnvDescriptor::default())
            })
            .collect();
        Self {
            values: values.into(),
        }
    }

    /// The documented default snapshot: the standard palette for a light
    /// scheme, standard contrast, full motion and 100% text scale.
    #[must_use]
    pub fn fallback() -> Self {
        StandardPalette::new().resolve(&EnvDescriptor::default())
    }

    /// Copy of this snapshot with `token` replaced.
    #[must_use]
    pub fn with(&self, token: ThemeToken, value: StyleValue) -> Self {
        let mut value = Some(value);
        Self::from_fn(|t| {
            if t == token
                && let Some(replacement) = value.take()
            {
                replacement
            } else {
                self.get(t).clone()
            }
        })
    }

    /// Value for `token`. Total over the vocabulary.
    #[must_use]
    pub fn get(&self, token: ThemeToken) -> &StyleValue {
        &self.values[token.index()]
    }

    /// Color value for a color token (transparent for non-color tokens).
    #[must_use]
    pub fn color(&self, token: ThemeToken) -> Rgba {
        self.get(token).as_color().unwrap_or(Rgba::TRANSPARENT)
    }

    /// Pixel value for a length token (0 for non-length tokens).
    #[must_use]
    pub fn length(&self, token: ThemeToken) -> f32 {
        self.get(token).as_length().unwrap_or(0.0)
    }

    /// Text value for a font-family or shadow token (empty otherwise).
    #[must_use]
    pub fn text(&self, token: ThemeToken) -> &str {
        self.get(token).as_text().unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (ThemeToken, &StyleValue)> {
        ThemeToken::ALL.iter().copied().zip(self.values.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Tokens whose values differ between `self` and `other`.
    #[must_use]
    pub fn diff(&self, other: &ThemeVariables) -> Vec<ThemeToken> {
        self.iter()
            .filter(|(token, value)| other.get(*token) != *value)
            .map(|(token, _)| token)
            .collect()
    }

    /// Token name to CSS text.
    #[must_use]
    pub fn to_css_map(&self) -> BTreeMap<&'static str, String> {
        self.iter()
            .map(|(token, value)| (token.name(), value.to_css()))
            .collect()
    }

    /// CSS custom property declarations, one per line, in vocabulary order:
    /// `--{prefix}-{name}: {value};`. An empty prefix yields `--{name}`.
    #[must_use]
    pub fn to_custom_properties(&self, prefix: &str) -> String {
        let prefix = prefix.trim_matches('-');
        let mut out = String::new();
        for (token, value) in self.iter() {
            if prefix.is_empty() {
                out.push_str(&format!("--{}: {};\n", token.name(), value.to_css()));
            } else {
                out.push_str(&format!("--{prefix}-{}: {};\n", token.name(), value.to_css()));
            }
        }
        out
    }
}

impl PartialEq for ThemeVariables {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.values, &other.values) || self.values == other.values
    }
}

impl std::fmt::Debug for ThemeVariables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(token, value)| (token.name(), value)))
            .finish()
    }
}

impl Default for ThemeVariables {
    fn default() -> Self {
        Self::fallback()
    }
}
