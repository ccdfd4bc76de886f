use std::time::Instant;

use anyhow::Result;
use futures::future::join_all;
use indicatif::MultiProgress;
use reqwest::Client;

use crate::config::{ProbeConfig, Schedule};
use crate::guard::{GUARD_CHECK_NAME, check_config_guard};
use crate::probe::{self, CorsProbe, HttpProbe, probe_cors, probe_http};
use crate::progress::{check_spinner, finish_spinner, multi_progress};
use crate::types::CheckResult;

const BODY_PREVIEW_CHARS: usize = 200;

/// The checks a run performs. Each is independent of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    CollectorHealth,
    CorsTraces,
    CorsLogs,
    ConfigGuard,
}

/// Report order. Results always come back in this order, whatever the schedule.
pub const REGISTRY: [CheckKind; 4] = [
    CheckKind::CollectorHealth,
    CheckKind::CorsTraces,
    CheckKind::CorsLogs,
    CheckKind::ConfigGuard,
];

impl CheckKind {
    pub fn title(self) -> &'static str {
        match self {
            CheckKind::CollectorHealth => "Collector health endpoint reachable",
            CheckKind::CorsTraces => "CORS preflight passes for OTLP traces endpoint",
            CheckKind::CorsLogs => "CORS preflight passes for OTLP logs endpoint",
            CheckKind::ConfigGuard => GUARD_CHECK_NAME,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub verbose: bool,
    pub show_progress: bool,
}

/// Run every registered check and return one result per check, in registry order.
///
/// Only client construction can fail; every probe failure becomes a failed
/// `CheckResult`.
pub async fn run_all(config: &ProbeConfig, options: RunOptions) -> Result<Vec<CheckResult>> {
    let client = probe::build_client(config.timeout)?;
    let mp = multi_progress(options.show_progress);

    let results = match config.schedule {
        Schedule::Concurrent => {
            join_all(
                REGISTRY
                    .iter()
                    .map(|&kind| run_one(kind, config, &client, &mp, options.verbose)),
            )
            .await
        }
        Schedule::Sequential => {
            let mut results = Vec::with_capacity(REGISTRY.len());
            for kind in REGISTRY {
                results.push(run_one(kind, config, &client, &mp, options.verbose).await);
            }
            results
        }
    };

    Ok(results)
}

async fn run_one(
    kind: CheckKind,
    config: &ProbeConfig,
    client: &Client,
    mp: &MultiProgress,
    verbose: bool,
) -> CheckResult {
    let pb = check_spinner(mp, kind.title());
    let start = Instant::now();

    let result = match kind {
        CheckKind::CollectorHealth => {
            let probe = probe_http(client, &config.collector_health).await;
            if verbose {
                let elapsed = start.elapsed().as_millis();
                mp.suspend(|| log_http(&config.collector_health, &probe, elapsed));
            }
            health_result(&probe)
        }
        CheckKind::CorsTraces | CheckKind::CorsLogs => {
            let url = if kind == CheckKind::CorsTraces {
                &config.otlp_traces
            } else {
                &config.otlp_logs
            };
            let probe = probe_cors(client, url, &config.origin).await;
            if verbose {
                let elapsed = start.elapsed().as_millis();
                mp.suspend(|| log_cors(url, &config.origin, &probe, elapsed));
            }
            cors_result(kind.title(), &probe, &config.origin)
        }
        CheckKind::ConfigGuard => {
            if verbose {
                mp.suspend(|| eprintln!("  read {}", config.app_config.display()));
            }
            check_config_guard(
                &config.app_config,
                &config.otlp_traces,
                &config.otlp_logs,
                &config.exclusion_marker,
            )
        }
    };

    finish_spinner(&pb, result.ok);
    result
}

/// Map a liveness probe onto the collector health check.
pub fn health_result(probe: &HttpProbe) -> CheckResult {
    let title = CheckKind::CollectorHealth.title();
    match probe {
        HttpProbe::Response { status, .. } if probe.ok() => {
            CheckResult::pass(title, Some(format!("HTTP {status}")))
        }
        HttpProbe::Response { status, .. } => CheckResult::fail(
            title,
            format!("HTTP {status}"),
            "Ensure the collector is running: cd otel && docker compose up -d",
        ),
        HttpProbe::Transport { error } => CheckResult::fail(
            title,
            error.clone(),
            "Ensure the collector is running: cd otel && docker compose up -d",
        ),
    }
}

/// Map a preflight probe onto a CORS check for one OTLP route.
pub fn cors_result(title: &str, probe: &CorsProbe, origin: &str) -> CheckResult {
    match probe {
        CorsProbe::Response {
            status,
            allow_origin,
            ..
        } => {
            let details = format!(
                "HTTP {status}, allow-origin={}",
                allow_origin.as_deref().unwrap_or("(none)")
            );
            if probe.ok() {
                CheckResult::pass(title, Some(details))
            } else {
                CheckResult::fail(title, details, cors_fix(origin))
            }
        }
        CorsProbe::Transport { error } => CheckResult::fail(title, error.clone(), cors_fix(origin)),
    }
}

fn cors_fix(origin: &str) -> String {
    format!(
        "In otel/otel-collector-config.yaml set cors.allowed_origins to include {origin}\n\
         Then restart: cd otel && docker compose restart otel-collector"
    )
}

fn log_http(url: &str, probe: &HttpProbe, elapsed_ms: u128) {
    match probe.error() {
        Some(error) => eprintln!("  GET {url} -> error after {elapsed_ms} ms: {error}"),
        None => {
            eprintln!(
                "  GET {url} -> HTTP {} ({elapsed_ms} ms)",
                probe.status().unwrap_or_default()
            );
            if let Some(body) = probe.body().filter(|b| !probe.ok() && !b.is_empty()) {
                eprintln!("    body: {}", preview(body));
            }
        }
    }
}

fn log_cors(url: &str, origin: &str, probe: &CorsProbe, elapsed_ms: u128) {
    match probe.error() {
        Some(error) => {
            eprintln!("  OPTIONS {url} (Origin: {origin}) -> error after {elapsed_ms} ms: {error}");
        }
        None => eprintln!(
            "  OPTIONS {url} (Origin: {origin}) -> HTTP {}, allow-origin={} ({elapsed_ms} ms)",
            probe.status().unwrap_or_default(),
            probe.allow_origin().unwrap_or("(none)")
        ),
    }
}

fn preview(body: &str) -> String {
    let mut out: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    if body.chars().count() > BODY_PREVIEW_CHARS {
        out.push('…');
    }
    out
}
