use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::cli::ProbeArgs;

pub const DEFAULT_COLLECTOR_HEALTH: &str = "http://localhost:13133/";
pub const DEFAULT_OTLP_TRACES: &str = "http://localhost:4318/v1/traces";
pub const DEFAULT_OTLP_LOGS: &str = "http://localhost:4318/v1/logs";
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_APP_CONFIG: &str = "app/src/embrace.ts";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
/// Token the SDK init config uses for its network-instrumentation exclusion list.
pub const DEFAULT_EXCLUSION_MARKER: &str = "ignoreUrls";

/// Optional settings file. Every key falls back to the built-in default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub collector_health: Option<String>,
    pub otlp_traces: Option<String>,
    pub otlp_logs: Option<String>,
    pub origin: Option<String>,
    pub app_config: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub exclusion_marker: Option<String>,
    #[serde(default)]
    pub sequential: bool,
}

/// How the runner schedules the registered checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Concurrent,
    Sequential,
}

/// Everything a run needs, resolved once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub collector_health: String,
    pub otlp_traces: String,
    pub otlp_logs: String,
    pub origin: String,
    pub app_config: PathBuf,
    pub timeout: Duration,
    pub exclusion_marker: String,
    pub schedule: Schedule,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            collector_health: DEFAULT_COLLECTOR_HEALTH.to_string(),
            otlp_traces: DEFAULT_OTLP_TRACES.to_string(),
            otlp_logs: DEFAULT_OTLP_LOGS.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            app_config: PathBuf::from(DEFAULT_APP_CONFIG),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            exclusion_marker: DEFAULT_EXCLUSION_MARKER.to_string(),
            schedule: Schedule::Concurrent,
        }
    }
}

impl ProbeConfig {
    /// Merge CLI flags over the settings file over the built-in defaults.
    pub fn resolve(args: &ProbeArgs, settings: Settings) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let timeout_secs = args
            .timeout
            .or(settings.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            anyhow::bail!("timeout must be at least 1 second");
        }

        let sequential = if args.concurrent {
            false
        } else {
            args.sequential || settings.sequential
        };

        Ok(Self {
            collector_health: args
                .collector_health
                .clone()
                .or(settings.collector_health)
                .unwrap_or(defaults.collector_health),
            otlp_traces: args
                .otlp_traces
                .clone()
                .or(settings.otlp_traces)
                .unwrap_or(defaults.otlp_traces),
            otlp_logs: args
                .otlp_logs
                .clone()
                .or(settings.otlp_logs)
                .unwrap_or(defaults.otlp_logs),
            origin: args
                .origin
                .clone()
                .or(settings.origin)
                .unwrap_or(defaults.origin),
            app_config: args
                .app_config
                .clone()
                .or(settings.app_config)
                .unwrap_or(defaults.app_config),
            timeout: Duration::from_secs(timeout_secs),
            exclusion_marker: settings
                .exclusion_marker
                .unwrap_or(defaults.exclusion_marker),
            schedule: if sequential {
                Schedule::Sequential
            } else {
                Schedule::Concurrent
            },
        })
    }
}

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    let settings: Settings = toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings: {}", path.display()))?;
    Ok(settings)
}

/// Returns the default path to `embrace-doctor.toml` relative to the current directory.
pub fn default_settings_path() -> PathBuf {
    PathBuf::from("embrace-doctor.toml")
}

/// An explicit path must exist. The default path is only read if present.
pub fn resolve_settings(explicit: Option<&Path>) -> anyhow::Result<Settings> {
    match explicit {
        Some(path) => load_settings(path),
        None => {
            let path = default_settings_path();
            if path.is_file() {
                load_settings(&path)
            } else {
                Ok(Settings::default())
            }
        }
    }
}
