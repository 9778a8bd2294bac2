//! `authprobe get` – one authenticated GET.

use anyhow::{Context, Result};
use authprobe_core::config::ProbeConfig;
use authprobe_core::handler;
use authprobe_core::request::FormFields;
use authprobe_core::transport::{CurlOptions, CurlTransport};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::surface_for;

/// Flags of `authprobe get`, before config fallbacks are applied.
#[derive(Debug, Default)]
pub struct GetArgs {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub output: Option<PathBuf>,
    pub connect_timeout: Option<u64>,
    pub timeout: Option<u64>,
}

impl GetArgs {
    /// Flags win over config. Missing values become empty strings and are
    /// passed to the transport as-is.
    pub(crate) fn fields(&self, cfg: &ProbeConfig) -> FormFields {
        let url = self
            .url
            .clone()
            .or_else(|| cfg.default_url.clone())
            .unwrap_or_default();
        let username = self
            .username
            .clone()
            .or_else(|| cfg.default_username.clone())
            .unwrap_or_default();
        FormFields::new(url, username, self.password.clone().unwrap_or_default())
    }

    pub(crate) fn curl_options(&self, cfg: &ProbeConfig) -> CurlOptions {
        let mut opts = cfg.curl_options();
        if let Some(s) = self.connect_timeout {
            opts.connect_timeout = Some(Duration::from_secs(s));
        }
        if let Some(s) = self.timeout {
            opts.timeout = Some(Duration::from_secs(s));
        }
        opts
    }
}

/// Returns whether the request succeeded.
pub async fn run_get(cfg: &ProbeConfig, args: GetArgs) -> Result<bool> {
    let fields = args.fields(cfg);
    let transport = Arc::new(CurlTransport::new(args.curl_options(cfg)));
    let surface = surface_for(args.output);
    let outcome = handler::submit(&fields, transport, surface)
        .await
        .context("request task join")?;
    Ok(outcome.is_success())
}
