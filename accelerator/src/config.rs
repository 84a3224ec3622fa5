use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

pub const DEFAULT_API_URL: &str = "https://mempool.space/api/v1/services";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Accelerator service settings. Field names match the TOML config file keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AcceleratorConfig {
    /// Gates all network activity. When off, fetches report [`crate::FetchOutcome::Disabled`]
    pub enabled: bool,
    /// Base URL of the mempool services backend
    pub api_url: String,
    /// Absolute per-request timeout
    pub timeout_ms: u64,
}

impl Default for AcceleratorConfig {
    fn default() -> Self {
        Self { enabled: false, api_url: DEFAULT_API_URL.to_string(), timeout_ms: DEFAULT_TIMEOUT_MS }
    }
}

impl AcceleratorConfig {
    pub fn new(enabled: bool, api_url: impl Into<String>) -> Self {
        Self { enabled, api_url: api_url.into(), ..Default::default() }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn from_toml(toml: &str) -> Result<Self> {
        Ok(toml::from_str(toml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Joins `path` to the base URL, ignoring a trailing slash on the latter
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }
}
