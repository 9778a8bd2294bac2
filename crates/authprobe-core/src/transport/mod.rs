//! HTTP transport: one GET, one response or one failure.
//!
//! The libcurl-backed implementation lives in [`curl`]; tests substitute
//! their own `Transport` to simulate servers.

mod curl;
mod status;

pub use self::curl::{CurlOptions, CurlTransport};

use crate::request::ProbeRequest;
use thiserror::Error;

/// A completed 2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl ProbeResponse {
    pub fn new(status: u32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Raw body as text (lossy UTF-8). Never parsed.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether the body parses as JSON. Diagnostic only.
    pub fn looks_like_json(&self) -> bool {
        serde_json::from_slice::<serde_json::Value>(&self.body).is_ok()
    }
}

/// Transport/HTTP failure: the only error kind a request produces.
///
/// `status` is the HTTP code, or 0 when no response arrived (connection
/// refused, DNS, malformed URL). `description` is the reason phrase or the
/// transport error text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request failed with status {status}: {description}")]
pub struct RequestFailure {
    pub status: u32,
    pub description: String,
}

impl RequestFailure {
    pub fn http(status: u32, reason: impl Into<String>) -> Self {
        Self {
            status,
            description: reason.into(),
        }
    }

    pub fn transport(description: impl Into<String>) -> Self {
        Self {
            status: 0,
            description: description.into(),
        }
    }
}

/// Issues a single GET. Blocking; callers on async code go through
/// [`crate::handler::submit`].
pub trait Transport: Send + Sync {
    fn get(&self, req: &ProbeRequest) -> Result<ProbeResponse, RequestFailure>;
}
