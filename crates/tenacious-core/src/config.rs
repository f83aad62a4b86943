use crate::request::ExecutionDefaults;
use crate::transport::CurlOptions;
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retry defaults (`[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of physical attempts per request (including the first).
    pub max_attempts: u32,
    /// Fixed wait between retryable attempts, in milliseconds. 0 = retry immediately.
    pub retry_interval_ms: u64,
    /// Treat a 2xx response with an empty body as success.
    pub allow_empty_body: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            retry_interval_ms: 500,
            allow_empty_body: false,
        }
    }
}

/// libcurl transport settings (`[transport]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    pub connect_timeout_secs: u64,
    /// Hard deadline for one attempt.
    pub timeout_secs: u64,
    pub follow_redirects: bool,
    pub max_redirections: u32,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 60,
            follow_redirects: true,
            max_redirections: 10,
            user_agent: None,
        }
    }
}

/// Global configuration loaded from `~/.config/tenacious/config.toml`.
///
/// Read once at startup and never mutated; callers derive per-request
/// settings from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenaciousConfig {
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub transport: TransportConfig,
}

impl TenaciousConfig {
    /// Reject values that would make every request invalid.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.retry.max_attempts >= 1,
            "retry.max_attempts must be 1 or larger"
        );
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn execution_defaults(&self) -> ExecutionDefaults {
        ExecutionDefaults {
            max_attempts: self.retry.max_attempts,
            retry_interval: Duration::from_millis(self.retry.retry_interval_ms),
            allow_empty_body: self.retry.allow_empty_body,
        }
    }

    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            connect_timeout: Duration::from_secs(self.transport.connect_timeout_secs),
            timeout: Duration::from_secs(self.transport.timeout_secs),
            follow_redirects: self.transport.follow_redirects,
            max_redirections: self.transport.max_redirections,
            user_agent: self.transport.user_agent.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tenacious")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TenaciousConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<TenaciousConfig> {
    if !path.exists() {
        let default_cfg = TenaciousConfig::default();
        let toml = default_cfg.to_toml_string()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: TenaciousConfig = toml::from_str(&data)?;
    cfg.validate()?;
    Ok(cfg)
}
