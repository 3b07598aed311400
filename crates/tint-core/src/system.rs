#![forbid(unsafe_code)]

//! Appearance read from the process environment, with a polling watcher.
//!
//! Desktop sessions export their appearance through environment variables
//! (see [`crate::appearance`]). [`SystemEnvironment`] re-runs detection on a
//! background thread at a fixed interval and fires the change callback only
//! when the detected descriptor differs from the previous poll.
//!
//! The watcher thread is owned by the returned [`Unsubscribe`]: cancelling
//! it (or dropping it) signals the thread and joins it before returning, so
//! no callback runs after unsubscribe completes.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use web_time::Instant;

use crate::appearance::{self, ColorScheme, Contrast, EnvDescriptor};
use crate::environment::{ChangeCallback, ThemeEnvironment, Unsubscribe};
use crate::error::{EnvironmentError, Result};

/// Default interval between environment polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Signal checked by the watcher loop.
#[derive(Clone)]
struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    /// Wait for either the stop signal or a timeout.
    ///
    /// Returns `true` if stopped, `false` if timed out.
    fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if *stopped {
            return true;
        }
        let (stopped, _) = cvar
            .wait_timeout(stopped, duration)
            .unwrap_or_else(PoisonError::into_inner);
        *stopped
    }

    fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }
}

/// Appearance detected from environment variables.
#[derive(Clone)]
pub struct SystemEnvironment {
    lookup: EnvLookup,
    poll_interval: Duration,
    forced_scheme: Option<ColorScheme>,
    forced_contrast: Option<Contrast>,
}

impl SystemEnvironment {
    /// Read the real process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    /// Use a custom environment lookup (for tests and sandboxed hosts).
    #[must_use]
    pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Arc::new(lookup),
            poll_interval: DEFAULT_POLL_INTERVAL,
            forced_scheme: None,
            forced_contrast: None,
        }
    }

    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Override whatever scheme detection finds.
    #[must_use]
    pub fn force_scheme(mut self, scheme: ColorScheme) -> Self {
        self.forced_scheme = Some(scheme);
        self
    }

    /// Override whatever contrast detection finds.
    #[must_use]
    pub fn force_contrast(mut self, contrast: Contrast) -> Self {
        self.forced_contrast = Some(contrast);
        self
    }

    /// Run detection once, applying forced values.
    #[must_use]
    pub fn detect(&self) -> Option<EnvDescriptor> {
        let detected = appearance::detect_with(|key| (self.lookup)(key));
        let mut descriptor = match (detected, self.forced_scheme) {
            (Some(desc), _) => desc,
            (None, Some(scheme)) => EnvDescriptor::new(scheme),
            (None, None) => return None,
        };
        if let Some(scheme) = self.forced_scheme {
            descriptor.scheme = scheme;
        }
        if let Some(contrast) = self.forced_contrast {
            descriptor.contrast = contrast;
        }
        Some(descriptor)
    }
}

impl Default for SystemEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SystemEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemEnvironment")
            .field("poll_interval", &self.poll_interval)
            .field("forced_scheme", &self.forced_scheme)
            .field("forced_contrast", &self.forced_contrast)
            .finish_non_exhaustive()
    }
}

impl ThemeEnvironment for SystemEnvironment {
    fn query_theme(&self) -> Result<EnvDescriptor> {
        self.detect().ok_or_else(|| {
            EnvironmentError::unsupported("no appearance signal in the process environment")
        })
    }

    fn subscribe(&self, on_change: ChangeCallback) -> Result<Unsubscribe> {
        if self.poll_interval.is_zero() {
            return Err(EnvironmentError::subscribe_failed(
                "poll interval must be non-zero",
            ));
        }

        // Taken here, not on the watcher thread, so a change right after
        // subscribe returns is always reported.
        let baseline = self.detect();
        let stop = StopSignal::new();
        let watcher = self.clone();
        let signal = stop.clone();
        let handle = thread::Builder::new()
            .name("tint-appearance-watcher".into())
            .spawn(move || watcher.watch(baseline, on_change, signal))
            .map_err(|err| EnvironmentError::subscribe_failed(err.to_string()))?;

        tracing::debug!(
            interval_ms = self.poll_interval.as_millis() as u64,
            "appearance watcher started"
        );

        Ok(Unsubscribe::new(move || {
            stop.stop();
            // A callback cancelling its own subscription must not join itself.
            if handle.thread().id() != thread::current().id() && handle.join().is_err() {
                tracing::warn!("appearance watcher panicked");
            }
            tracing::debug!("appearance watcher stopped");
        }))
    }
}

impl SystemEnvironment {
    fn watch(
        &self,
        mut last: Option<EnvDescriptor>,
        on_change: ChangeCallback,
        stop: StopSignal,
    ) {
        loop {
            if stop.wait_timeout(self.poll_interval) {
                break;
            }
            let started = Instant::now();
            let current = self.detect();
            if current == last {
                continue;
            }
            if let Some(descriptor) = current {
                tracing::trace!(
                    scheme = descriptor.scheme.as_str(),
                    detect_us = started.elapsed().as_micros() as u64,
                    "appearance change detected"
                );
                on_change(&descriptor);
            }
            last = current;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use tracing_test::traced_test;

    type SharedEnv = Arc<Mutex<HashMap<String, String>>>;

    fn shared_env(pairs: &[(&str, &str)]) -> SharedEnv {
        Arc::new(Mutex::new(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        ))
    }

    fn system_over(env: &SharedEnv) -> SystemEnvironment {
        let env = Arc::clone(env);
        SystemEnvironment::with_lookup(move |key| env.lock().unwrap().get(key).cloned())
            .poll_interval(Duration::from_millis(5))
    }

    #[test]
    fn query_without_signal_is_unsupported() {
        let env = shared_env(&[]);
        let system = system_over(&env);
        assert!(matches!(
            system.query_theme(),
            Err(EnvironmentError::Unsupported { .. })
        ));
    }

    #[test]
    fn forced_scheme_supplies_missing_signal() {
        let env = shared_env(&[]);
        let system = system_over(&env)
            .force_scheme(ColorScheme::Dark)
            .force_contrast(Contrast::More);
        let desc = system.query_theme().expect("forced");
        assert_eq!(desc.scheme, ColorScheme::Dark);
        assert_eq!(desc.contrast, Contrast::More);
    }

    #[test]
    fn forced_scheme_overrides_detection() {
        let env = shared_env(&[("TINT_COLOR_SCHEME", "dark"), ("TINT_TEXT_SCALE", "150")]);
        let desc = system_over(&env)
            .force_scheme(ColorScheme::Light)
            .query_theme()
            .expect("forced");
        assert_eq!(desc.scheme, ColorScheme::Light);
        assert_eq!(desc.text_scale_percent, 150);
    }

    #[test]
    fn zero_interval_cannot_subscribe() {
        let env = shared_env(&[]);
        let system = system_over(&env).poll_interval(Duration::ZERO);
        assert!(matches!(
            system.subscribe(Box::new(|_| {})),
            Err(EnvironmentError::SubscribeFailed { .. })
        ));
    }

    #[test]
    fn watcher_reports_changes_only() {
        let env = shared_env(&[("TINT_COLOR_SCHEME", "light")]);
        let system = system_over(&env);
        let (tx, rx) = mpsc::channel();
        let sub = system
            .subscribe(Box::new(move |desc| {
                let _ = tx.send(desc.scheme);
            }))
            .expect("watcher starts");

        // Unchanged environment: no callback.
        assert!(rx.recv_timeout(Duration::from_millis(40)).is_err());

        env.lock()
            .unwrap()
            .insert("TINT_COLOR_SCHEME".into(), "dark".into());
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)),
            Ok(ColorScheme::Dark)
        );

        sub.cancel();
        env.lock()
            .unwrap()
            .insert("TINT_COLOR_SCHEME".into(), "light".into());
        assert!(rx.recv_timeout(Duration::from_millis(40)).is_err());
    }

    #[test]
    fn change_right_after_subscribe_is_reported() {
        let env = shared_env(&[("TINT_COLOR_SCHEME", "light")]);
        // Long enough that the watcher cannot have polled before the flip.
        let system = system_over(&env).poll_interval(Duration::from_millis(50));
        let (tx, rx) = mpsc::channel();
        let sub = system
            .subscribe(Box::new(move |desc| {
                let _ = tx.send(desc.scheme);
            }))
            .expect("watcher starts");

        env.lock()
            .unwrap()
            .insert("TINT_COLOR_SCHEME".into(), "dark".into());
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)),
            Ok(ColorScheme::Dark)
        );
        sub.cancel();
    }

    #[traced_test]
    #[test]
    fn panicking_watcher_is_logged_on_cancel() {
        let armed = Arc::new(AtomicBool::new(false));
        let trigger = Arc::clone(&armed);
        let system = SystemEnvironment::with_lookup(move |key| {
            assert!(!trigger.load(Ordering::SeqCst), "lookup failed");
            (key == "TINT_COLOR_SCHEME").then(|| "light".to_string())
        })
        .poll_interval(Duration::from_millis(5));

        let sub = system.subscribe(Box::new(|_| {})).expect("watcher starts");
        armed.store(true, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(50));
        sub.cancel();

        assert!(logs_contain("appearance watcher panicked"));
    }

    #[test]
    fn stop_signal_wait_returns_true_when_stopped() {
        let signal = StopSignal::new();
        assert!(!signal.wait_timeout(Duration::from_millis(1)));
        signal.stop();
        assert!(signal.wait_timeout(Duration::from_secs(5)));
    }
}
