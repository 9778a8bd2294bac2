use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::transport::CurlOptions;

fn default_follow_redirects() -> bool {
    true
}

/// Global configuration loaded from `~/.config/authprobe/config.toml`.
///
/// Passwords are never read from or written to this file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// URL used when `--url` is not given.
    #[serde(default)]
    pub default_url: Option<String>,
    /// Username used when `--username` is not given.
    #[serde(default)]
    pub default_username: Option<String>,
    /// Follow 3xx redirects (default true).
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,
    /// Connect timeout in seconds (None = no timeout).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Whole-transfer timeout in seconds (None = no timeout).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            default_url: None,
            default_username: None,
            follow_redirects: true,
            connect_timeout_secs: None,
            timeout_secs: None,
        }
    }
}

impl ProbeConfig {
    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            follow_redirects: self.follow_redirects,
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("authprobe")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ProbeConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<ProbeConfig> {
    if !path.exists() {
        let default_cfg = ProbeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("writing default config {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: ProbeConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}
