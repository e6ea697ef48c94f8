//! Logging Infrastructure
//!
//! The engine only emits `tracing` events; hosts that have no subscriber of
//! their own can install this one. `RUST_LOG` overrides the configured level.

use std::path::Path;

use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

use crate::config::ReconConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the logger (stdout, info level, plain text)
pub fn init_logger() -> bool {
    init_logger_with_file(None, false, None)
}

/// Initialize the logger from configuration
///
/// Production writes JSON lines; other environments write plain text.
pub fn init_from_config(config: &ReconConfig) -> bool {
    init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    )
}

/// Initialize the logger with optional daily rolling file output
///
/// Returns false when a global subscriber was already installed.
pub fn init_logger_with_file(
    log_level: Option<&str>,
    json_format: bool,
    log_dir: Option<&str>,
) -> bool {
    let level = log_level.unwrap_or("info");
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<BoxedLayer> = vec![console_layer(json_format)];

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists() {
            let file_appender = tracing_appender::rolling::daily(log_path, "cash-recon");
            layers.push(file_layer(file_appender, json_format));
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .is_ok()
}

fn console_layer(json_format: bool) -> BoxedLayer {
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .boxed()
    } else {
        fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_target(false)
            .boxed()
    }
}

fn file_layer(
    appender: tracing_appender::rolling::RollingFileAppender,
    json_format: bool,
) -> BoxedLayer {
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_writer(appender)
            .boxed()
    } else {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(appender)
            .boxed()
    }
}
