//! libcurl-backed transport.

use super::status::final_status_line;
use super::{ProbeResponse, RequestFailure, Transport};
use crate::request::ProbeRequest;
use std::time::Duration;

/// Transfer knobs. Timeouts are off unless configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOptions {
    pub follow_redirects: bool,
    pub connect_timeout: Option<Duration>,
    pub timeout: Option<Duration>,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            follow_redirects: true,
            connect_timeout: None,
            timeout: None,
        }
    }
}

/// Runs each GET on a fresh `Easy` handle in the current thread.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    opts: CurlOptions,
}

impl CurlTransport {
    pub fn new(opts: CurlOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> CurlOptions {
        self.opts
    }
}

fn curl_failure(e: ::curl::Error) -> RequestFailure {
    let mut description = e.description().to_string();
    if let Some(extra) = e.extra_description() {
        description = format!("{}: {}", description, extra);
    }
    RequestFailure::transport(description)
}

impl Transport for CurlTransport {
    fn get(&self, req: &ProbeRequest) -> Result<ProbeResponse, RequestFailure> {
        let mut headers: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = ::curl::easy::Easy::new();
        easy.url(&req.url).map_err(curl_failure)?;
        easy.get(true).map_err(curl_failure)?;
        easy.follow_location(self.opts.follow_redirects)
            .map_err(curl_failure)?;
        if let Some(d) = self.opts.connect_timeout {
            easy.connect_timeout(d).map_err(curl_failure)?;
        }
        if let Some(d) = self.opts.timeout {
            easy.timeout(d).map_err(curl_failure)?;
        }

        let mut list = ::curl::easy::List::new();
        for line in req.header_lines() {
            list.append(&line).map_err(curl_failure)?;
        }
        easy.http_headers(list).map_err(curl_failure)?;

        {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    headers.push(header_line(data));
                    true
                })
                .map_err(curl_failure)?;
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_failure)?;
            transfer.perform().map_err(curl_failure)?;
        }

        let code = easy.response_code().map_err(curl_failure)?;
        if !(200..300).contains(&code) {
            return Err(failure_for_code(code, &headers));
        }

        Ok(ProbeResponse::new(code, body))
    }
}

/// One raw header line; bytes outside UTF-8 (e.g. a Latin-1 reason phrase)
/// are replaced rather than dropping the line.
fn header_line(data: &[u8]) -> String {
    String::from_utf8_lossy(data).trim_end().to_string()
}

/// Failure for a completed transfer whose response code is not 2xx.
/// Code 0 means no HTTP response at all (e.g. a `file://` URL).
fn failure_for_code(code: u32, headers: &[String]) -> RequestFailure {
    if code == 0 {
        return RequestFailure::transport(NO_HTTP_RESPONSE);
    }
    let reason = final_status_line(headers)
        .filter(|s| s.code == code)
        .map(|s| s.reason)
        .unwrap_or_default();
    RequestFailure::http(code, reason)
}

const NO_HTTP_RESPONSE: &str = "no HTTP response";
