// Helpers shared by the prober and the report: URL comparison, error chains, durations.

use reqwest::Url;
use serde::Serializer;
use std::error::Error;
use std::time::Duration;

/// Returns the final URL if it points somewhere other than `requested`.
///
/// Both sides are compared parsed, so `http://host` and `http://host/` are the same location.
pub fn redirect_target(requested: &str, final_url: &Url) -> Option<String> {
    match Url::parse(requested) {
        Ok(req) if req == *final_url => None,
        _ => Some(final_url.to_string()),
    }
}

/// Innermost message in an error's source chain.
pub fn root_cause(err: &(dyn Error + 'static)) -> String {
    let mut current = err;
    while let Some(src) = current.source() {
        current = src;
    }
    current.to_string()
}

pub fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}
