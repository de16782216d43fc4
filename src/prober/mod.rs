use serde::Serialize;
use std::time::Duration;

pub mod http;

/// A labelled URL to probe.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProbeTarget<'a> {
    pub label: &'a str,
    pub url: &'a str,
}

impl<'a> ProbeTarget<'a> {
    pub const fn new(label: &'a str, url: &'a str) -> Self {
        Self { label, url }
    }
}

/// How a single probe attempt ended.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// Terminal response below 400.
    Success {
        status: u16,
        redirected_url: Option<String>,
    },
    /// Server answered with a 4xx/5xx status.
    HttpError {
        status: u16,
        reason: String,
        redirected_url: Option<String>,
    },
    /// Resolution, connect, TLS or protocol failure.
    Transport { reason: String },
    /// No response within the configured timeout.
    Timeout { after_secs: u64 },
    Unexpected { description: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub label: String,
    pub url: String,
    #[serde(rename = "elapsed_seconds", serialize_with = "crate::util::serialize_secs")]
    pub elapsed: Duration,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Success { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self.outcome {
            ProbeOutcome::Success { status, .. } | ProbeOutcome::HttpError { status, .. } => {
                Some(status)
            }
            _ => None,
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Final URL when it differs from the requested one.
    pub fn redirected_url(&self) -> Option<&str> {
        match &self.outcome {
            ProbeOutcome::Success { redirected_url, .. }
            | ProbeOutcome::HttpError { redirected_url, .. } => redirected_url.as_deref(),
            _ => None,
        }
    }

    /// Human-readable error line, `None` on success.
    pub fn error(&self) -> Option<String> {
        match &self.outcome {
            ProbeOutcome::Success { .. } => None,
            ProbeOutcome::HttpError { status, reason, .. } => {
                Some(format!("HTTP Error: {} {}", status, reason))
            }
            ProbeOutcome::Transport { reason } => Some(format!("URL Error: {}", reason)),
            ProbeOutcome::Timeout { after_secs } => Some(format!("Timeout after {}s", after_secs)),
            ProbeOutcome::Unexpected { description } => {
                Some(format!("Unexpected error: {}", description))
            }
        }
    }
}
