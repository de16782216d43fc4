use crate::prober::{ProbeOutcome, ProbeResult};
use crate::util::{redirect_target, root_cause};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode, Url};
use tokio::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Identifies the prober to the remote side.
pub const CLIENT_USER_AGENT: &str = "Mozilla/5.0 BaiduTester/1.0";

const MAX_REDIRECTS: usize = 10;

/// Issue exactly one GET against `url` and classify how it ended.
///
/// Never fails: every error is folded into the returned [`ProbeOutcome`], and the
/// elapsed time is recorded on every path.
pub async fn probe_http(label: &str, url: &str, timeout_secs: u64) -> ProbeResult {
    let start = Instant::now();
    let outcome = attempt(url, timeout_secs).await;
    let result = ProbeResult {
        label: label.to_string(),
        url: url.to_string(),
        elapsed: start.elapsed(),
        outcome,
    };

    match result.error() {
        None => info!(
            "http probe {} success: {:?} in {:?}",
            url,
            result.status_code(),
            result.elapsed
        ),
        Some(e) => warn!("http probe {} failed: {}", url, e),
    }
    match serde_json::to_string(&result) {
        Ok(record) => debug!("probe result {}", record),
        Err(e) => debug!("could not encode probe result for {}: {}", url, e),
    }

    result
}

async fn attempt(url: &str, timeout_secs: u64) -> ProbeOutcome {
    // the client owns the connection; dropping it at return releases the socket
    let client = match Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(CLIENT_USER_AGENT)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .no_proxy()
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            return ProbeOutcome::Unexpected {
                description: root_cause(&e),
            };
        }
    };

    match client.get(url).send().await {
        Ok(resp) => classify_response(url, resp.status(), resp.url()),
        Err(e) => classify_error(&e, timeout_secs),
    }
}

fn classify_response(requested: &str, status: StatusCode, final_url: &Url) -> ProbeOutcome {
    let redirected_url = redirect_target(requested, final_url);
    if status.is_client_error() || status.is_server_error() {
        ProbeOutcome::HttpError {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            redirected_url,
        }
    } else {
        ProbeOutcome::Success {
            status: status.as_u16(),
            redirected_url,
        }
    }
}

/// Transport failures win over timeouts: a connect that timed out is still a connect failure.
fn classify_error(err: &reqwest::Error, timeout_secs: u64) -> ProbeOutcome {
    if err.is_connect() {
        ProbeOutcome::Transport {
            reason: root_cause(err),
        }
    } else if err.is_timeout() {
        ProbeOutcome::Timeout {
            after_secs: timeout_secs,
        }
    } else if err.is_request() || err.is_redirect() {
        ProbeOutcome::Transport {
            reason: root_cause(err),
        }
    } else {
        ProbeOutcome::Unexpected {
            description: root_cause(err),
        }
    }
}
