//! `authprobe interactive` – a prompt loop standing in for a form.
//!
//! Each round edits the form fields and fires one request. A blank answer
//! leaves that field as it was, like an untouched input box. Requests are
//! not awaited before the next prompt; all of them are awaited at EOF.
//!
//! The password prompt is plain stdin: what is typed echoes to the
//! terminal. Use `authprobe get` with `AUTHPROBE_PASSWORD` to keep it off screen.

use anyhow::{Context, Result};
use authprobe_core::config::ProbeConfig;
use authprobe_core::handler::{self, Outcome};
use authprobe_core::request::{FormFields, FormSource};
use authprobe_core::transport::CurlTransport;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use super::surface_for;

/// Current contents of the three input fields.
#[derive(Debug, Clone, Default)]
pub(crate) struct FormState {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl FormState {
    pub(crate) fn from_config(cfg: &ProbeConfig) -> Self {
        Self {
            url: cfg.default_url.clone().unwrap_or_default(),
            username: cfg.default_username.clone().unwrap_or_default(),
            password: String::new(),
        }
    }

    /// Applies one answer to a field; blank keeps the existing value.
    pub(crate) fn edit(field: &mut String, answer: &str) {
        let answer = answer.trim_end_matches(['\r', '\n']);
        if !answer.is_empty() {
            *field = answer.to_string();
        }
    }
}

impl FormSource for FormState {
    fn read_fields(&self) -> FormFields {
        FormFields::new(&self.url, &self.username, &self.password)
    }
}

fn prompt(label: &str, current: &str) {
    let mut err = std::io::stderr().lock();
    if current.is_empty() {
        let _ = write!(err, "{}: ", label);
    } else {
        let _ = write!(err, "{} [{}]: ", label, current);
    }
    let _ = err.flush();
}

/// Returns whether every submitted request succeeded.
pub async fn run_interactive(cfg: &ProbeConfig, output: Option<PathBuf>) -> Result<bool> {
    let transport = Arc::new(CurlTransport::new(cfg.curl_options()));
    let surface = surface_for(output);
    let mut form = FormState::from_config(cfg);
    let mut pending: Vec<JoinHandle<Outcome>> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    'rounds: loop {
        prompt("url", &form.url);
        let Some(answer) = lines.next_line().await? else { break 'rounds };
        FormState::edit(&mut form.url, &answer);

        prompt("username", &form.username);
        let Some(answer) = lines.next_line().await? else { break 'rounds };
        FormState::edit(&mut form.username, &answer);

        prompt("password", if form.password.is_empty() { "" } else { "****" });
        let Some(answer) = lines.next_line().await? else { break 'rounds };
        FormState::edit(&mut form.password, &answer);

        pending.push(handler::submit(
            &form,
            Arc::clone(&transport),
            Arc::clone(&surface),
        ));
    }

    tracing::debug!("interactive: EOF, awaiting {} request(s)", pending.len());
    let mut all_ok = true;
    for h in pending {
        let outcome = h.await.context("request task join")?;
        all_ok &= outcome.is_success();
    }
    Ok(all_ok)
}
