//! Form snapshot and the GET request derived from it.

use crate::credentials::Credentials;
use std::fmt;

/// Accept header a JSON-typed AJAX GET sends.
pub const ACCEPT_JSON: &str = "application/json, text/javascript, */*; q=0.01";

/// One invocation's inputs: server URL, username, password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub url: String,
    pub credentials: Credentials,
}

impl FormFields {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            credentials: Credentials::new(username, password),
        }
    }
}

/// Source of form fields. Read again on every invocation; implementations
/// must not hand back values cached from a previous read.
pub trait FormSource {
    fn read_fields(&self) -> FormFields;
}

impl FormSource for FormFields {
    fn read_fields(&self) -> FormFields {
        self.clone()
    }
}

impl<F> FormSource for F
where
    F: Fn() -> FormFields,
{
    fn read_fields(&self) -> FormFields {
        self()
    }
}

/// A GET request ready for the transport. The URL is passed through uninterpreted.
#[derive(Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub url: String,
    /// Header (name, value) pairs in send order.
    pub headers: Vec<(String, String)>,
}

impl ProbeRequest {
    pub fn from_fields(fields: &FormFields) -> Self {
        let headers = vec![
            (
                "Authorization".to_string(),
                fields.credentials.authorization_value(),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), ACCEPT_JSON.to_string()),
        ];
        Self {
            url: fields.url.clone(),
            headers,
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Header lines as sent on the wire (`Name: value`).
    pub fn header_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.headers.iter().map(|(k, v)| format!("{}: {}", k, v))
    }
}

impl fmt::Debug for ProbeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if k.eq_ignore_ascii_case("authorization") {
                    (k.as_str(), "<redacted>")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();
        f.debug_struct("ProbeRequest")
            .field("url", &self.url)
            .field("headers", &headers)
            .finish()
    }
}
