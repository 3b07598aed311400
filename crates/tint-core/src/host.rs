#![forbid(unsafe_code)]

//! Host-pushed appearance state.
//!
//! [`HostEnvironment`] models a host shell that pushes style updates into
//! the embedded UI (an IPC message, a settings page, a test driver). The
//! current descriptor sits in an [`ArcSwapOption`] so `query_theme` is a
//! wait-free read from any thread; `push` swaps it and notifies listeners.
//!
//! # Invariants
//!
//! 1. Listeners are notified in registration order.
//! 2. Callbacks run outside the listener lock, so a callback may itself
//!    subscribe or unsubscribe.
//! 3. A listener removed by [`Unsubscribe`] is never called by a `push`
//!    that starts after the removal.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwapOption;

use crate::appearance::EnvDescriptor;
use crate::environment::{ChangeCallback, ThemeEnvironment, Unsubscribe};
use crate::error::{EnvironmentError, Result};

struct Listener {
    id: u64,
    callback: Arc<ChangeCallback>,
}

struct HostInner {
    current: ArcSwapOption<EnvDescriptor>,
    listeners: Mutex<Vec<Listener>>,
    next_id: AtomicU64,
}

impl HostInner {
    fn listeners(&self) -> MutexGuard<'_, Vec<Listener>> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// A cloneable handle to host-pushed appearance state.
///
/// Clones share the same descriptor and listener list.
#[derive(Clone)]
pub struct HostEnvironment {
    inner: Arc<HostInner>,
}

impl HostEnvironment {
    /// Create a host that already knows its appearance.
    #[must_use]
    pub fn new(initial: EnvDescriptor) -> Self {
        let host = Self::pending();
        host.inner.current.store(Some(Arc::new(initial)));
        host
    }

    /// Create a host that has not pushed anything yet.
    ///
    /// Queries fail with [`EnvironmentError::QueryFailed`] until the first
    /// [`push`](Self::push).
    #[must_use]
    pub fn pending() -> Self {
        Self {
            inner: Arc::new(HostInner {
                current: ArcSwapOption::empty(),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Replace the current descriptor and notify every listener.
    ///
    /// Returns the number of listeners notified.
    pub fn push(&self, descriptor: EnvDescriptor) -> usize {
        self.inner.current.store(Some(Arc::new(descriptor)));

        let callbacks: Vec<Arc<ChangeCallback>> = self
            .inner
            .listeners()
            .iter()
            .map(|listener| Arc::clone(&listener.callback))
            .collect();

        tracing::trace!(
            scheme = descriptor.scheme.as_str(),
            listeners = callbacks.len(),
            "host appearance pushed"
        );

        for callback in &callbacks {
            callback(&descriptor);
        }
        callbacks.len()
    }

    /// The last pushed descriptor, if any.
    #[must_use]
    pub fn current(&self) -> Option<EnvDescriptor> {
        self.inner.current.load_full().map(|desc| *desc)
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners().len()
    }
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self::new(EnvDescriptor::default())
    }
}

impl std::fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("current", &self.current())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl ThemeEnvironment for HostEnvironment {
    fn query_theme(&self) -> Result<EnvDescriptor> {
        self.current()
            .ok_or_else(|| EnvironmentError::query_failed("host has not pushed an appearance yet"))
    }

    fn subscribe(&self, on_change: ChangeCallback) -> Result<Unsubscribe> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners().push(Listener {
            id,
            callback: Arc::new(on_change),
        });

        let inner = Arc::downgrade(&self.inner);
        Ok(Unsubscribe::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.listeners().retain(|listener| listener.id != id);
            }
        }))
    }
}
