mod check;
mod cli;
mod config;
mod guard;
mod probe;
mod progress;
mod report;
mod types;

use clap::Parser;
use cli::{Cli, Commands};
use config::ProbeConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => {
            let code = run_check(&cli).await;
            std::process::exit(code);
        }
    }
}

/// Resolve configuration, run every check and render the report.
/// Returns exit code: 0=all passed, 1=some check failed, 2=setup error.
async fn run_check(cli: &Cli) -> i32 {
    let settings = match config::resolve_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return 2;
        }
    };
    let probe_config = match ProbeConfig::resolve(&cli.probe, settings) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return 2;
        }
    };

    if cli.verbose {
        eprintln!("collector health: {}", probe_config.collector_health);
        eprintln!("otlp traces:      {}", probe_config.otlp_traces);
        eprintln!("otlp logs:        {}", probe_config.otlp_logs);
        eprintln!("origin:           {}", probe_config.origin);
        eprintln!("app config:       {}", probe_config.app_config.display());
        eprintln!(
            "timeout:          {}s ({:?})",
            probe_config.timeout.as_secs(),
            probe_config.schedule
        );
    }

    let options = check::RunOptions {
        verbose: cli.verbose,
        show_progress: !cli.json,
    };
    let results = match check::run_all(&probe_config, options).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return 2;
        }
    };

    let summary = if cli.json {
        report::print_json(&results)
    } else {
        report::print_report(&results)
    };
    summary.exit_code()
}
