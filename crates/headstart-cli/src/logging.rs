// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! File logging for the terminal session.
//!
//! The terminal belongs to the UI, so every event goes to a daily-rolling
//! file. `RUST_LOG` wins over the configured `[log].level` when set and valid.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_PREFIX: &str = "headstart.log";

pub fn init(level: &str, dir: &Path) -> Result<()> {
    let filter = env_filter(level)?;

    fs::create_dir_all(dir).with_context(|| format!("create log directory {}", dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .context("install tracing subscriber")?;
    Ok(())
}

fn env_filter(level: &str) -> Result<EnvFilter> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, warning) = select_filter(rust_log.as_deref(), level)?;
    if let Some(warning) = warning {
        eprintln!("warning: {warning}");
    }
    Ok(filter)
}

/// An unparsable `RUST_LOG` falls back to the configured level with a warning.
fn select_filter(rust_log: Option<&str>, level: &str) -> Result<(EnvFilter, Option<String>)> {
    let mut warning = None;
    if let Some(directives) = rust_log.filter(|directives| !directives.trim().is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return Ok((filter, None)),
            Err(error) => {
                warning = Some(format!(
                    "ignoring invalid RUST_LOG {directives:?} ({error}); using [log].level {level:?}"
                ));
            }
        }
    }
    let filter = EnvFilter::try_new(level)
        .with_context(|| format!("invalid [log].level filter {level:?}"))?;
    Ok((filter, warning))
}

#[cfg(test)]
mod tests {
    use super::select_filter;

    #[test]
    fn configured_level_must_be_a_valid_filter() {
        assert!(select_filter(None, "debug").is_ok());
        assert!(select_filter(None, "headstart_app=trace,warn").is_ok());
        let error = select_filter(None, "headstart=loud").expect_err("garbage filter should fail");
        assert!(error.to_string().contains("[log].level"));
    }

    #[test]
    fn valid_rust_log_wins_without_a_warning() {
        let (filter, warning) =
            select_filter(Some("headstart_app=trace"), "warn").expect("valid filter");
        assert!(filter.to_string().contains("headstart_app"));
        assert_eq!(warning, None);
    }

    #[test]
    fn invalid_rust_log_warns_and_uses_configured_level() {
        let (filter, warning) =
            select_filter(Some("headstart=loud"), "info").expect("configured level is valid");
        assert!(filter.to_string().contains("info"));
        let warning = warning.expect("invalid RUST_LOG should warn");
        assert!(warning.contains("RUST_LOG"));
        assert!(warning.contains("headstart=loud"));
    }

    #[test]
    fn blank_rust_log_is_treated_as_unset() {
        let (_, warning) = select_filter(Some("  "), "info").expect("configured level is valid");
        assert_eq!(warning, None);
    }
}
