#![forbid(unsafe_code)]

//! Mounts the theme bridge over one snapshot of the process environment and
//! prints the "Hello world" panel as the legacy consumer sees it. No watcher
//! is started since nothing is pumped after the first render.
//!
//! Configuration comes from the file named by `TINT_THEME_CONFIG`; logging
//! is controlled by `TINT_LOG`.

use std::process::ExitCode;

use tintbridge::{Bridge, BridgeConfig, Panel, ScopeStack, init_tracing};

fn main() -> ExitCode {
    init_tracing();

    let config = match BridgeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "failed to load theme config");
            return ExitCode::FAILURE;
        }
    };

    let scopes = ScopeStack::new();
    let mut bridge = match Bridge::snapshot_from_config(&scopes, &config) {
        Ok(bridge) => bridge,
        Err(err) => {
            tracing::error!(error = %err, "failed to mount theme bridge");
            return ExitCode::FAILURE;
        }
    };

    let view = match Panel::default().render_in(&scopes) {
        Ok(view) => view,
        Err(err) => {
            tracing::error!(error = %err, "failed to render panel");
            return ExitCode::FAILURE;
        }
    };

    println!(":root {{\n{}}}", bridge.custom_properties("tint"));
    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize panel");
            return ExitCode::FAILURE;
        }
    }

    bridge.unmount();
    ExitCode::SUCCESS
}
