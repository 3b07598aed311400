#![forbid(unsafe_code)]

//! Update passes: per-cycle coalescing of [`Observable`] notifications.
//!
//! A UI update cycle may replace the same snapshot several times (a burst of
//! environment notifications). Consumers must only observe the final
//! snapshot of the cycle. An [`UpdatePass`] defers all notifications until
//! the outermost pass exits, then fires each unique callback once with the
//! latest value.
//!
//! # Usage
//!
//! ```
//! use tint_runtime::reactive::{Observable, UpdatePass};
//!
//! let scheme = Observable::new("light");
//! {
//!     let _pass = UpdatePass::new();
//!     scheme.set("dark");  // deferred
//!     scheme.set("light"); // deferred, coalesced
//!     scheme.set("dark");  // deferred, coalesced
//! } // subscribers fire once here, with "dark"
//! ```
//!
//! # Invariants
//!
//! 1. Nested passes are supported: only the outermost pass flushes.
//! 2. Within a pass, `Observable::get()` always returns the latest value
//!    (values change immediately, only notifications are deferred).
//! 3. Notifications raised *during* the flush (a derived observable reacting
//!    to its source) are drained in the same flush, in enqueue order.
//! 4. Flush calls deferred callbacks in the order they were first enqueued.
//!
//! # Failure Modes
//!
//! - **Callback panics during flush**: Remaining callbacks are still called.
//!   The first panic is re-raised after all callbacks have been attempted.
//! - **Feedback loops**: A subscriber graph that keeps re-notifying itself is
//!   cut off after [`MAX_FLUSH_ROUNDS`] rounds with a warning.
//!
//! [`Observable`]: super::Observable

use std::cell::RefCell;
use tracing::{debug, debug_span, warn};
use web_time::Instant;

/// Upper bound on drain rounds within a single flush.
pub const MAX_FLUSH_ROUNDS: usize = 64;

type DeferredNotify = Box<dyn FnOnce()>;

struct DeferredEntry {
    key: Option<usize>,
    notify: DeferredNotify,
}

struct PassContext {
    /// Nesting depth. Only flush when this reaches 0.
    depth: u32,
    deferred: Vec<DeferredEntry>,
}

thread_local! {
    static PASS_CTX: RefCell<Option<PassContext>> = const { RefCell::new(None) };
}

/// Returns true if an update pass is active (or flushing) on this thread.
pub fn in_pass() -> bool {
    PASS_CTX.with(|ctx| ctx.borrow().is_some())
}

/// Enqueue a deferred notification, or run it now if no pass is active.
///
/// Returns `true` if the notification was deferred.
pub fn defer_or_run(f: impl FnOnce() + 'static) -> bool {
    enqueue(None, Box::new(f))
}

/// Enqueue a deferred notification keyed by `key`.
///
/// If the key is already queued, the queued callback is replaced so the
/// latest one wins while the original enqueue position is kept.
pub fn defer_or_run_keyed(key: usize, f: impl FnOnce() + 'static) -> bool {
    enqueue(Some(key), Box::new(f))
}

fn enqueue(key: Option<usize>, notify: DeferredNotify) -> bool {
    PASS_CTX.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        let Some(pass) = guard.as_mut() else {
            drop(guard);
            notify();
            return false;
        };
        match key.and_then(|k| pass.deferred.iter_mut().find(|e| e.key == Some(k))) {
            Some(entry) => entry.notify = notify,
            None => pass.deferred.push(DeferredEntry { key, notify }),
        }
        true
    })
}

fn take_deferred() -> Vec<DeferredNotify> {
    PASS_CTX.with(|ctx| {
        ctx.borrow_mut()
            .as_mut()
            .map(|pass| {
                std::mem::take(&mut pass.deferred)
                    .into_iter()
                    .map(|entry| entry.notify)
                    .collect()
            })
            .unwrap_or_default()
    })
}

/// Flush all deferred notifications. Called by the outermost `UpdatePass`.
fn flush() {
    let started = Instant::now();
    let _span = debug_span!(
        "tint.propagate",
        deferred = true,
        subscribers = tracing::field::Empty,
        rounds = tracing::field::Empty,
        duration_us = tracing::field::Empty
    )
    .entered();

    let mut first_panic: Option<Box<dyn std::any::Any + Send>> = None;
    let mut delivered = 0u64;
    let mut rounds = 0usize;

    loop {
        let deferred = take_deferred();
        if deferred.is_empty() {
            break;
        }
        if rounds == MAX_FLUSH_ROUNDS {
            warn!(
                dropped = deferred.len(),
                "update pass exceeded {MAX_FLUSH_ROUNDS} flush rounds; dropping notifications"
            );
            break;
        }
        rounds += 1;
        delivered += deferred.len() as u64;
        for notify in deferred {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(notify));
            if let Err(payload) = result
                && first_panic.is_none()
            {
                first_panic = Some(payload);
            }
        }
    }

    let duration_us = started.elapsed().as_micros() as u64;
    let span = tracing::Span::current();
    span.record("subscribers", delivered);
    span.record("rounds", rounds as u64);
    span.record("duration_us", duration_us);
    if delivered > 0 {
        debug!(subscribers = delivered, rounds, duration_us, "update pass flushed");
    }

    if let Some(payload) = first_panic {
        PASS_CTX.with(|ctx| *ctx.borrow_mut() = None);
        std::panic::resume_unwind(payload);
    }
}

/// RAII guard for one UI update pass.
///
/// While an `UpdatePass` is alive, all [`Observable`](super::Observable)
/// notifications on this thread are deferred. When the outermost pass
/// drops, they fire.
pub struct UpdatePass {
    is_root: bool,
}

impl UpdatePass {
    /// Begin a new pass, or nest inside the current one.
    #[must_use]
    pub fn new() -> Self {
        let is_root = PASS_CTX.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            match guard.as_mut() {
                Some(pass) => {
                    pass.depth += 1;
                    false
                }
                None => {
                    *guard = Some(PassContext {
                        depth: 1,
                        deferred: Vec::new(),
                    });
                    true
                }
            }
        });
        Self { is_root }
    }

    /// Number of notifications queued in the current pass.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        PASS_CTX.with(|ctx| ctx.borrow().as_ref().map_or(0, |p| p.deferred.len()))
    }

    /// Whether this guard is the outermost pass (responsible for the flush).
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.is_root
    }
}

impl Default for UpdatePass {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for UpdatePass {
    fn drop(&mut self) {
        let should_flush = PASS_CTX.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            match guard.as_mut() {
                Some(pass) => {
                    pass.depth -= 1;
                    pass.depth == 0
                }
                None => false,
            }
        });

        if should_flush {
            flush();
            PASS_CTX.with(|ctx| {
                *ctx.borrow_mut() = None;
            });
        }
    }
}

impl std::fmt::Debug for UpdatePass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdatePass")
            .field("is_root", &self.is_root)
            .field("pending", &self.pending_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Observable;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn pass_defers_notifications() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let _sub = obs.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        {
            let _pass = UpdatePass::new();
            obs.set(1);
            obs.set(2);
            obs.set(3);
            assert_eq!(count.get(), 0);
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn values_updated_immediately_inside_pass() {
        let obs = Observable::new(0);
        let _pass = UpdatePass::new();
        obs.set(42);
        assert_eq!(obs.get(), 42);
    }

    #[test]
    fn nested_pass_only_outermost_flushes() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let _sub = obs.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        {
            let outer = UpdatePass::new();
            assert!(outer.is_root());
            {
                let inner = UpdatePass::new();
                assert!(!inner.is_root());
                obs.set(1);
            }
            assert_eq!(count.get(), 0, "inner pass must not flush");
            assert_eq!(outer.pending_count(), 1);
        }
        assert_eq!(count.get(), 1);
        assert!(!in_pass());
    }

    #[test]
    fn derived_notifications_drain_in_same_flush() {
        let source = Observable::new(1);
        let doubled = Observable::new(2);
        let sink = doubled.clone();
        let _link = source.subscribe(move |v| {
            sink.set(v * 2);
        });

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _consumer = doubled.subscribe(move |v| seen_clone.borrow_mut().push(*v));

        {
            let _pass = UpdatePass::new();
            source.set(5);
            source.set(7);
        }
        assert_eq!(*seen.borrow(), vec![14]);
    }

    #[test]
    fn unkeyed_defer_runs_immediately_outside_pass() {
        let ran = Rc::new(Cell::new(false));
        let ran_clone = Rc::clone(&ran);
        assert!(!defer_or_run(move || ran_clone.set(true)));
        assert!(ran.get());
    }

    #[test]
    fn keyed_defer_replaces_queued_callback() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let _pass = UpdatePass::new();
            let a = Rc::clone(&log);
            assert!(defer_or_run_keyed(7, move || a.borrow_mut().push("first")));
            let b = Rc::clone(&log);
            assert!(defer_or_run_keyed(7, move || b.borrow_mut().push("second")));
            let c = Rc::clone(&log);
            assert!(defer_or_run(move || c.borrow_mut().push("other")));
        }
        assert_eq!(*log.borrow(), vec!["second", "other"]);
    }

    #[test]
    fn runaway_feedback_is_cut_off() {
        let counter = Observable::new(0u64);
        let sink = counter.clone();
        let _loop = counter.subscribe(move |v| {
            sink.set(v + 1);
        });

        {
            let _pass = UpdatePass::new();
            counter.set(1);
        }
        assert!(counter.get() <= MAX_FLUSH_ROUNDS as u64 + 1);
        assert!(!in_pass());
    }

    #[test]
    fn panic_in_callback_still_runs_others_and_resets() {
        let obs_a = Observable::new(0);
        let obs_b = Observable::new(0);
        let hit = Rc::new(Cell::new(false));
        let hit_clone = Rc::clone(&hit);
        let _a = obs_a.subscribe(|_| panic!("consumer failed"));
        let _b = obs_b.subscribe(move |_| hit_clone.set(true));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _pass = UpdatePass::new();
            obs_a.set(1);
            obs_b.set(1);
        }));
        assert!(result.is_err());
        assert!(hit.get());
        assert!(!in_pass());
    }
}
