#![forbid(unsafe_code)]

//! Runtime: reactive snapshots, update passes and provider scopes.
//!
//! # Role in tintbridge
//! `tint-runtime` is the propagation layer between a producer of theme
//! snapshots and the UI elements that read them. It knows nothing about
//! tokens or environments.
//!
//! # Key Components
//!
//! - [`Observable`] / [`ReadSignal`] - single writer, many readers
//! - [`UpdatePass`] - defer and coalesce notifications within one UI cycle
//! - [`ScopeStack`] - typed provide/lookup with nearest-enclosing resolution
//!
//! All of these are `Rc`-based and stay on the UI thread.

pub mod reactive;
pub mod scope;

pub use reactive::{Observable, ReadSignal, Subscription, UpdatePass};
pub use scope::{ScopeGuard, ScopeStack};
