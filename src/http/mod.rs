//! HTTP client module with bounded manual redirect following.

mod client;
mod redirect;

pub use client::{HttpClient, USER_AGENT};
pub use redirect::{MAX_REDIRECTS, ResponseAction, classify_response, classify_status, resolve_location};
