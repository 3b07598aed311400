#![forbid(unsafe_code)]

//! E2E tests for the mounted bridge.
//!
//! 1. `hello_world` – panel rendering across environment changes
//! 2. `system_watch` – polling watcher feeding the bridge
//! 3. `config_file` – bridge built from a TOML file
//! 4. `observability` – propagation span and flush event

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tintbridge::prelude::*;
use tintbridge::{Rgba, UnavailableEnvironment};

fn shared_lookup(env: &Arc<Mutex<HashMap<String, String>>>) -> SystemEnvironment {
    let env = Arc::clone(env);
    SystemEnvironment::with_lookup(move |key| env.lock().unwrap().get(key).cloned())
        .poll_interval(Duration::from_millis(5))
}

// =========================================================================
// 1. Hello world
// =========================================================================

mod hello_world {
    use super::*;

    #[test]
    fn panel_follows_environment() {
        let scopes = ScopeStack::new();
        let host = HostEnvironment::default();
        let mut bridge = Bridge::mount(&scopes, &host, StandardPalette::new()).unwrap();

        let light = Panel::default().render_in(&scopes).unwrap();
        assert_eq!(light.text, "Hello world");
        assert!(!light.dark);

        host.push(EnvDescriptor::new(ColorScheme::Dark));
        assert_eq!(bridge.pump(), 1);
        let dark = Panel::default().render_in(&scopes).unwrap();
        assert!(dark.dark);
        assert_ne!(dark.background, light.background);
        assert_eq!(dark.text, light.text);
    }

    #[test]
    fn unavailable_host_renders_fallback() {
        let scopes = ScopeStack::new();
        let _bridge =
            Bridge::mount(&scopes, &UnavailableEnvironment::new(), StandardPalette::new()).unwrap();
        let view = Panel::default().render_in(&scopes).unwrap();
        let expected =
            Panel::default().render(&LegacyTheme::from_variables(&ThemeVariables::fallback()));
        assert_eq!(view, expected);
    }

    #[test]
    fn panel_outside_bridge_is_misuse() {
        let scopes = ScopeStack::new();
        {
            let _bridge = Bridge::mount(&scopes, &HostEnvironment::default(), StandardPalette::new())
                .unwrap();
        }
        assert!(matches!(
            Panel::default().render_in(&scopes),
            Err(ThemeError::MissingLegacyTheme)
        ));
    }
}

// =========================================================================
// 2. System watch
// =========================================================================

mod system_watch {
    use super::*;

    #[test]
    fn watcher_change_reaches_panel_after_pump() {
        let env = Arc::new(Mutex::new(HashMap::from([(
            "TINT_COLOR_SCHEME".to_string(),
            "light".to_string(),
        )])));
        let scopes = ScopeStack::new();
        let mut bridge = Bridge::mount(&scopes, &shared_lookup(&env), StandardPalette::new()).unwrap();
        assert!(!Panel::default().render_in(&scopes).unwrap().dark);

        env.lock()
            .unwrap()
            .insert("TINT_COLOR_SCHEME".into(), "dark".into());

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut applied = 0;
        while applied == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            applied = bridge.pump();
        }
        assert!(applied > 0, "watcher never reported the change");
        assert!(Panel::default().render_in(&scopes).unwrap().dark);
    }

    #[test]
    fn unmount_stops_watcher() {
        let env = Arc::new(Mutex::new(HashMap::from([(
            "TINT_COLOR_SCHEME".to_string(),
            "light".to_string(),
        )])));
        let scopes = ScopeStack::new();
        let mut bridge = Bridge::mount(&scopes, &shared_lookup(&env), StandardPalette::new()).unwrap();
        let legacy = bridge.legacy();
        bridge.unmount();

        env.lock()
            .unwrap()
            .insert("TINT_COLOR_SCHEME".into(), "dark".into());
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(bridge.pump(), 0);
        assert!(!legacy.get().is_dark);
    }
}

// =========================================================================
// 3. Config file
// =========================================================================

mod config_file {
    use super::*;

    #[test]
    fn bridge_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"
[appearance]
scheme = "dark"

[watch]
poll_interval_ms = 50

[overrides]
"color-surface" = "#101010"
"spacing-m" = "20px"
"##
        )
        .unwrap();

        let config = BridgeConfig::from_toml_file(file.path()).unwrap();
        let scopes = ScopeStack::new();
        let _bridge =
            Bridge::from_config_with(&scopes, &config, SystemEnvironment::with_lookup(|_| None))
                .unwrap();

        let view = Panel::default().render_in(&scopes).unwrap();
        assert!(view.dark);
        assert_eq!(view.background, Rgba::from_hex(0x101010));
        assert_eq!(view.padding_px, 20.0);
    }
}

// =========================================================================
// 4. Observability
// =========================================================================

mod observability {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::registry::LookupSpan;

    #[derive(Debug, Clone)]
    struct CapturedSpan {
        name: String,
        fields: HashMap<String, String>,
    }

    #[derive(Debug, Clone)]
    struct CapturedEvent {
        level: tracing::Level,
        fields: HashMap<String, String>,
    }

    #[derive(Default)]
    struct Captured {
        spans: Mutex<Vec<CapturedSpan>>,
        events: Mutex<Vec<CapturedEvent>>,
    }

    struct CaptureLayer(Arc<Captured>);

    struct FieldVisitor(Vec<(String, String)>);

    impl tracing::field::Visit for FieldVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            self.0.push((field.name().to_string(), format!("{value:?}")));
        }
        fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
            self.0.push((field.name().to_string(), value.to_string()));
        }
        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            self.0.push((field.name().to_string(), value.to_string()));
        }
        fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
            self.0.push((field.name().to_string(), value.to_string()));
        }
    }

    impl<S> tracing_subscriber::Layer<S> for CaptureLayer
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::span::Id,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut visitor = FieldVisitor(Vec::new());
            attrs.record(&mut visitor);
            self.0.spans.lock().unwrap().push(CapturedSpan {
                name: attrs.metadata().name().to_string(),
                fields: visitor.0.into_iter().collect(),
            });
        }

        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut visitor = FieldVisitor(Vec::new());
            event.record(&mut visitor);
            self.0.events.lock().unwrap().push(CapturedEvent {
                level: *event.metadata().level(),
                fields: visitor.0.into_iter().collect(),
            });
        }
    }

    fn with_captured_tracing(f: impl FnOnce()) -> Arc<Captured> {
        let captured = Arc::new(Captured::default());
        let subscriber = tracing_subscriber::registry().with(CaptureLayer(Arc::clone(&captured)));
        tracing::subscriber::with_default(subscriber, f);
        captured
    }

    #[test]
    fn pump_emits_deferred_propagation_span() {
        let captured = with_captured_tracing(|| {
            let scopes = ScopeStack::new();
            let host = HostEnvironment::default();
            let mut bridge = Bridge::mount(&scopes, &host, StandardPalette::new()).unwrap();
            let _consumer = bridge.legacy().subscribe(|_| {});
            host.push(EnvDescriptor::new(ColorScheme::Dark));
            bridge.pump();
        });

        let spans = captured.spans.lock().unwrap();
        let propagate: Vec<&CapturedSpan> =
            spans.iter().filter(|s| s.name == "tint.propagate").collect();
        assert!(
            propagate
                .iter()
                .any(|s| s.fields.get("deferred").map(String::as_str) == Some("true")),
            "no deferred propagation span: {propagate:?}"
        );

        let events = captured.events.lock().unwrap();
        let flushed = events
            .iter()
            .find(|e| e.fields.get("message").map(String::as_str) == Some("update pass flushed"))
            .expect("flush event");
        assert_eq!(flushed.level, tracing::Level::DEBUG);
        // Variables -> adapter, then adapter -> consumer.
        assert_eq!(flushed.fields.get("subscribers").map(String::as_str), Some("2"));
        assert_eq!(flushed.fields.get("rounds").map(String::as_str), Some("2"));
    }

    #[test]
    fn fallback_logs_a_warning() {
        let captured = with_captured_tracing(|| {
            let scopes = ScopeStack::new();
            let _bridge =
                Bridge::mount(&scopes, &UnavailableEnvironment::new(), StandardPalette::new())
                    .unwrap();
        });
        let events = captured.events.lock().unwrap();
        assert!(events.iter().any(|e| e.level == tracing::Level::WARN
            && e.fields
                .get("message")
                .is_some_and(|m| m.contains("using fallback variables"))));
    }
}
