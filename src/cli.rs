use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "embrace-doctor",
    about = "Integration checks for browser telemetry SDK -> OTLP/HTTP -> OTel Collector"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Print results as JSON instead of the text report
    #[arg(long, global = true)]
    pub json: bool,

    /// TOML settings file (default: ./embrace-doctor.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub probe: ProbeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Endpoint and artifact overrides. Unset flags fall back to the settings file, then defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct ProbeArgs {
    /// Collector health endpoint [default: http://localhost:13133/]
    #[arg(long, global = true)]
    pub collector_health: Option<String>,

    /// OTLP traces endpoint [default: http://localhost:4318/v1/traces]
    #[arg(long, global = true)]
    pub otlp_traces: Option<String>,

    /// OTLP logs endpoint [default: http://localhost:4318/v1/logs]
    #[arg(long, global = true)]
    pub otlp_logs: Option<String>,

    /// Browser origin for CORS preflight [default: http://localhost:5173]
    #[arg(long, global = true)]
    pub origin: Option<String>,

    /// Path to the SDK init config [default: app/src/embrace.ts]
    #[arg(long, global = true)]
    pub app_config: Option<PathBuf>,

    /// Per-request timeout in seconds [default: 5]
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Run checks one at a time instead of concurrently
    #[arg(long, global = true, conflicts_with = "concurrent")]
    pub sequential: bool,

    /// Run checks concurrently even if the settings file asks for sequential
    #[arg(long, global = true)]
    pub concurrent: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run all checks
    Check,
}
