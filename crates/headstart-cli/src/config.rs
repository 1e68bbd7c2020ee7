// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use headstart_app::{DEFAULT_TAB_COUNT, MAX_TAB_COUNT};
use headstart_tui::UiOptions;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "headstart";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_STATUS_TIMEOUT: &str = "2s";
const DEFAULT_HIGHLIGHT_TIMEOUT: &str = "1s";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub tabs: Option<i64>,
    pub status_timeout: Option<String>,
    pub highlight_timeout: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            tabs: Some(i64::from(DEFAULT_TAB_COUNT)),
            status_timeout: Some(DEFAULT_STATUS_TIMEOUT.to_owned()),
            highlight_timeout: Some(DEFAULT_HIGHLIGHT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub dir: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            dir: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("HEADSTART_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set HEADSTART_CONFIG_PATH to the config file")
        })?;

        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` at the top",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(tabs) = self.ui.tabs
            && !(1..=i64::from(MAX_TAB_COUNT)).contains(&tabs)
        {
            bail!(
                "ui.tabs in {} must be between 1 and {}, got {}",
                path.display(),
                MAX_TAB_COUNT,
                tabs
            );
        }

        for (key, value) in [
            ("ui.status_timeout", &self.ui.status_timeout),
            ("ui.highlight_timeout", &self.ui.highlight_timeout),
        ] {
            if let Some(raw) = value {
                let parsed = parse_duration(raw)
                    .with_context(|| format!("{key} in {}", path.display()))?;
                if parsed <= Duration::ZERO {
                    bail!(
                        "{key} in {} must be positive, got {}",
                        path.display(),
                        raw
                    );
                }
            }
        }

        if let Some(dir) = &self.log.dir
            && !Path::new(dir).is_absolute()
        {
            bail!(
                "log.dir in {} must be an absolute path, got {:?}",
                path.display(),
                dir
            );
        }

        Ok(())
    }

    pub fn tab_count(&self) -> u32 {
        self.ui
            .tabs
            .and_then(|tabs| u32::try_from(tabs).ok())
            .unwrap_or(DEFAULT_TAB_COUNT)
    }

    pub fn ui_options(&self) -> Result<UiOptions> {
        Ok(UiOptions {
            status_timeout: parse_duration(
                self.ui
                    .status_timeout
                    .as_deref()
                    .unwrap_or(DEFAULT_STATUS_TIMEOUT),
            )?,
            highlight_timeout: parse_duration(
                self.ui
                    .highlight_timeout
                    .as_deref()
                    .unwrap_or(DEFAULT_HIGHLIGHT_TIMEOUT),
            )?,
        })
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.log.dir {
            return Ok(PathBuf::from(dir));
        }
        let root = dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .ok_or_else(|| anyhow!("cannot resolve a log directory; set [log].dir"))?;
        Ok(root.join(APP_NAME).join("logs"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# headstart config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# Number of independent tabs (1-9)\ntabs = {}\n# How long copy feedback stays in the status bar\nstatus_timeout = \"{}\"\n# How long a freshly added row stays highlighted\nhighlight_timeout = \"{}\"\n\n[log]\n# Filter used when RUST_LOG is unset\nlevel = \"{}\"\n# Optional. Default is the platform state dir (for example ~/.local/state/headstart/logs)\n# dir = \"/absolute/path/to/logs\"\n",
            path.display(),
            DEFAULT_TAB_COUNT,
            DEFAULT_STATUS_TIMEOUT,
            DEFAULT_HIGHLIGHT_TIMEOUT,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        let secs = mins
            .checked_mul(60)
            .ok_or_else(|| anyhow!("duration {raw:?} is too large"))?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 2s)")
}
