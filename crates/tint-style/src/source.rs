#![forbid(unsafe_code)]

//! The variable source: environment in, [`ThemeVariables`] scope out.
//!
//! # Lifecycle
//!
//! 1. **Mount**: subscribe for changes, then query the environment once,
//!    resolve the initial snapshot through the palette and provide a
//!    read-only signal into the scope stack. The snapshot exists before any
//!    descendant renders. A change reported between subscribe and query is
//!    queued and applied by the first pump.
//! 2. **Change**: the environment callback may fire on any thread. It only
//!    enqueues the new descriptor. [`VariableSource::pump`] drains the queue
//!    on the UI thread inside one [`UpdatePass`], recomputing a full
//!    snapshot for each descriptor; consumers see the last one.
//! 3. **Unmount**: mark the source dead, cancel the subscription, drop
//!    anything still queued and pop the scope. Later callbacks are ignored.
//!
//! # Failure Modes
//!
//! - **Query fails**: the documented [`ThemeVariables::fallback`] snapshot is
//!   exposed and a warning logged.
//! - **Subscribe fails**: the initial snapshot stays in place without live
//!   updates, with a warning.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};

use tint_core::{EnvDescriptor, ThemeEnvironment, Unsubscribe};
use tint_runtime::{Observable, ReadSignal, ScopeGuard, ScopeStack, UpdatePass};
use tracing::{debug, info, warn};
use web_time::Instant;

use crate::palette::Palette;
use crate::variables::ThemeVariables;

/// Producer of the [`ThemeVariables`] scope.
pub struct VariableSource {
    variables: Observable<ThemeVariables>,
    palette: Box<dyn Palette>,
    descriptor: Option<EnvDescriptor>,
    inbox: Option<Receiver<EnvDescriptor>>,
    mounted: Arc<AtomicBool>,
    unsubscribe: Option<Unsubscribe>,
    scope: Option<ScopeGuard>,
}

impl VariableSource {
    /// Mount a source under `scopes`.
    ///
    /// Never fails: environment errors degrade to the fallback snapshot or
    /// to a static one.
    pub fn mount<E>(scopes: &ScopeStack, environment: &E, palette: impl Palette + 'static) -> Self
    where
        E: ThemeEnvironment + ?Sized,
    {
        let palette: Box<dyn Palette> = Box::new(palette);

        // Subscribe before the query so a change landing between the two is
        // queued rather than lost.
        let mounted = Arc::new(AtomicBool::new(true));
        let (tx, rx) = mpsc::channel();
        let flag = Arc::clone(&mounted);
        let unsubscribe = match environment.subscribe(Box::new(move |desc: &EnvDescriptor| {
            if flag.load(Ordering::Acquire) {
                // The receiver is gone after unmount; nothing to report.
                let _ = tx.send(*desc);
            }
        })) {
            Ok(guard) => Some(guard),
            Err(err) => {
                warn!(error = %err, "theme change subscription failed; variables will not update");
                None
            }
        };

        let (descriptor, initial) = match environment.query_theme() {
            Ok(desc) => (Some(desc), palette.resolve(&desc)),
            Err(err) => {
                warn!(error = %err, "theme environment query failed; using fallback variables");
                (None, ThemeVariables::fallback())
            }
        };

        let variables = Observable::new(initial);
        let scope = scopes.provide(variables.read_only());

        info!(
            palette = palette.name(),
            scheme = descriptor.map(|d| d.scheme.as_str()),
            live = unsubscribe.is_some(),
            "theme variable source mounted"
        );

        Self {
            variables,
            palette,
            descriptor,
            inbox: unsubscribe.is_some().then_some(rx),
            mounted,
            unsubscribe,
            scope: Some(scope),
        }
    }

    /// Process queued environment changes in one update pass.
    ///
    /// Returns the number of descriptors processed. After unmount this is
    /// always 0.
    pub fn pump(&mut self) -> usize {
        if !self.is_mounted() {
            return 0;
        }
        let Some(inbox) = self.inbox.as_ref() else {
            return 0;
        };

        let _pass = UpdatePass::new();
        let mut processed = 0;
        for desc in inbox.try_iter() {
            let started = Instant::now();
            let next = self.palette.resolve(&desc);
            let changed = self.variables.set(next);
            debug!(
                scheme = desc.scheme.as_str(),
                contrast = desc.contrast.as_str(),
                reduced_motion = desc.reduced_motion,
                text_scale = desc.text_scale_percent,
                changed,
                recompute_us = started.elapsed().as_micros() as u64,
                "theme variables recomputed"
            );
            self.descriptor = Some(desc);
            processed += 1;
        }
        processed
    }

    /// Read-only handle on the current snapshot.
    #[must_use]
    pub fn signal(&self) -> ReadSignal<ThemeVariables> {
        self.variables.read_only()
    }

    #[must_use]
    pub fn current(&self) -> ThemeVariables {
        self.variables.get()
    }

    /// The descriptor behind the current snapshot (`None` on fallback).
    #[must_use]
    pub fn descriptor(&self) -> Option<EnvDescriptor> {
        self.descriptor
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Whether change notifications are attached.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.is_mounted() && self.unsubscribe.is_some()
    }

    /// Tear down. Idempotent; also runs on drop.
    pub fn unmount(&mut self) {
        if !self.mounted.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe.cancel();
        }
        let dropped = self.inbox.take().map_or(0, |rx| rx.try_iter().count());
        self.scope = None;
        info!(dropped, "theme variable source unmounted");
    }
}

impl Drop for VariableSource {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for VariableSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariableSource")
            .field("palette", &self.palette.name())
            .field("descriptor", &self.descriptor)
            .field("mounted", &self.is_mounted())
            .field("live", &self.unsubscribe.is_some())
            .finish_non_exhaustive()
    }
}
