#![forbid(unsafe_code)]

//! Reactive snapshots for theme propagation.
//!
//! - [`Observable`]: single-writer snapshot cell with equality-memoized
//!   change notification.
//! - [`ReadSignal`]: the read-only face handed to consumers.
//! - [`UpdatePass`]: RAII guard coalescing notifications for one update cycle.

pub mod observable;
pub mod update_pass;

pub use observable::{Observable, ReadSignal, Subscription};
pub use update_pass::{MAX_FLUSH_ROUNDS, UpdatePass};
