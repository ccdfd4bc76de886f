use reqwest::Client;

use super::{describe_error, is_success};

/// Result of a plain GET against a liveness endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpProbe {
    /// The server answered; status and body are kept whatever the status.
    Response { status: u16, body: String },
    /// DNS, connect, timeout or body read failure.
    Transport { error: String },
}

impl HttpProbe {
    pub fn ok(&self) -> bool {
        matches!(self, Self::Response { status, .. } if is_success(*status))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Response { body, .. } => Some(body),
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

/// Issue a single GET with no custom headers. No retries.
pub async fn probe_http(client: &Client, url: &str) -> HttpProbe {
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => return HttpProbe::Transport { error: describe_error(e) },
    };
    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => HttpProbe::Response { status, body },
        Err(e) => HttpProbe::Transport { error: describe_error(e) },
    }
}
