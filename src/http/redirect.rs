//! Response classification for manual redirect following.

use anyhow::{Context, Result};
use reqwest::header::LOCATION;
use reqwest::{Response, StatusCode, Url};

/// Maximum number of redirect hops followed for a single download.
pub const MAX_REDIRECTS: usize = 5;

/// What to do with a response whose headers have arrived.
#[derive(Debug, PartialEq, Eq)]
pub enum ResponseAction {
    /// 2xx: stream the body.
    Accept,
    /// 3xx with a `Location` header: re-issue the request there.
    Follow(String),
    /// Anything else, including a 3xx without `Location`.
    Reject(StatusCode),
}

pub fn classify_status(status: StatusCode, location: Option<&str>) -> ResponseAction {
    if status.is_success() {
        return ResponseAction::Accept;
    }
    if status.is_redirection() {
        if let Some(location) = location.filter(|l| !l.is_empty()) {
            return ResponseAction::Follow(location.to_string());
        }
    }
    ResponseAction::Reject(status)
}

pub fn classify_response(response: &Response) -> ResponseAction {
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok());
    classify_status(response.status(), location)
}

/// Resolve a `Location` value against the URL that produced it.
/// Absolute locations replace the URL, relative ones are joined.
pub fn resolve_location(current: &Url, location: &str) -> Result<Url> {
    current
        .join(location)
        .with_context(|| format!("Invalid redirect location {:?} from {}", location, current))
}
