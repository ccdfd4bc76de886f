use reqwest::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD,
    ORIGIN,
};
use reqwest::{Client, Method};

use super::{describe_error, is_success};

/// Result of a simulated browser preflight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsProbe {
    Response {
        status: u16,
        allow_origin: Option<String>,
        ok: bool,
    },
    Transport {
        error: String,
    },
}

impl CorsProbe {
    pub fn ok(&self) -> bool {
        matches!(self, Self::Response { ok: true, .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    pub fn allow_origin(&self) -> Option<&str> {
        match self {
            Self::Response { allow_origin, .. } => allow_origin.as_deref(),
            Self::Transport { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Response { .. } => None,
            Self::Transport { error } => Some(error),
        }
    }
}

/// A preflight is granted on a 2xx whose allow-origin is `*` or exactly `origin`.
pub fn origin_granted(status: u16, allow_origin: Option<&str>, origin: &str) -> bool {
    is_success(status) && matches!(allow_origin, Some(allowed) if allowed == "*" || allowed == origin)
}

/// Send the OPTIONS request a browser issues before an OTLP export POST.
pub async fn probe_cors(client: &Client, url: &str, origin: &str) -> CorsProbe {
    let response = match client
        .request(Method::OPTIONS, url)
        .header(ORIGIN, origin)
        .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => return CorsProbe::Transport { error: describe_error(e) },
    };

    let status = response.status().as_u16();
    let allow_origin = response
        .headers()
        .get(ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    // Drain so the connection is released even when the check fails.
    let _ = response.bytes().await;

    let ok = origin_granted(status, allow_origin.as_deref(), origin);
    CorsProbe::Response {
        status,
        allow_origin,
        ok,
    }
}
