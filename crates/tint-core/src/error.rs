#![forbid(unsafe_code)]

//! Errors raised by host environments.
//!
//! Every variant here is recoverable: consumers of a [`ThemeEnvironment`]
//! are expected to absorb them with a default rather than fail a render.
//!
//! [`ThemeEnvironment`]: crate::environment::ThemeEnvironment

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnvironmentError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    /// The host exposes no appearance information at all.
    #[error("theme environment unsupported: {reason}")]
    Unsupported { reason: String },

    /// The host has an appearance API but the query failed.
    #[error("theme query failed: {reason}")]
    QueryFailed { reason: String },

    /// Change notifications could not be attached.
    #[error("theme change subscription failed: {reason}")]
    SubscribeFailed { reason: String },
}

impl EnvironmentError {
    #[must_use]
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn query_failed(reason: impl Into<String>) -> Self {
        Self::QueryFailed {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn subscribe_failed(reason: impl Into<String>) -> Self {
        Self::SubscribeFailed {
            reason: reason.into(),
        }
    }
}
