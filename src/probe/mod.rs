//! Single-shot network probes against the collector.
//!
//! Probes never fail with an error: transport problems come back as a
//! `Transport` variant carrying the full cause chain, protocol problems as a
//! `Response` that reports the observed status.

use std::time::Duration;

use anyhow::Context;

pub mod cors;
pub mod http;

#[cfg(test)]
pub(crate) mod stub;

pub use cors::{CorsProbe, probe_cors};
pub use http::{HttpProbe, probe_http};

/// Build the client shared by every probe in a run.
///
/// Redirects are not followed and environment proxies are ignored, so the
/// status we report is the one the target endpoint actually returned.
pub fn build_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .context("Failed to build HTTP client")
}

pub(crate) fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Render a transport error with its source chain, e.g.
/// "error sending request ...: tcp connect error: Connection refused (os error 111)".
pub(crate) fn describe_error(err: reqwest::Error) -> String {
    format!("{:#}", anyhow::Error::new(err))
}
