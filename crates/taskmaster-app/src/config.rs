//! Workspace configuration read from `.taskmaster/config.toml`.

use std::{
    fs,
    path::Path,
    time::Duration,
};

use anyhow::{Context, Result, bail};
use reqwest::Url;
use serde::Deserialize;

use crate::mock::Latency;

const CONFIG_DIR: &str = ".taskmaster";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration loaded from `.taskmaster/config.toml`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Repository selection and HTTP settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Settings for the simulated backend.
    #[serde(default)]
    pub mock: MockConfig,
}

impl AppConfig {
    /// Load configuration from `dir`, falling back to defaults when no file exists.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let config_path = dir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to parse {}", config_path.display()))
    }

    /// Parse and validate configuration text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.backend.validate()
    }
}

/// Which repository implementation to use.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Simulated in-memory backend.
    #[default]
    Mock,
    /// REST backend at `base_url`.
    Http,
}

/// `[backend]` block.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BackendConfig {
    /// Which repository to build.
    #[serde(default)]
    pub kind: BackendKind,
    /// Server root for the HTTP backend, e.g. `http://localhost:5000/`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Mock,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Request timeout for the HTTP backend.
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("backend.timeout_secs must be greater than zero");
        }
        if self.kind == BackendKind::Http {
            let Some(base_url) = self.base_url.as_deref() else {
                bail!("backend.base_url is required when backend.kind = \"http\"");
            };
            Url::parse(base_url).with_context(|| format!("backend.base_url is not a valid URL: {base_url}"))?;
        }
        Ok(())
    }
}

/// `[mock]` block.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct MockConfig {
    /// Delay before `list` answers.
    #[serde(default = "default_list_latency_ms")]
    pub list_latency_ms: u64,
    /// Delay before create, update and delete answer.
    #[serde(default = "default_mutation_latency_ms")]
    pub mutation_latency_ms: u64,
    /// Start with the sample tasks instead of an empty list.
    #[serde(default = "default_seed")]
    pub seed: bool,
}

const fn default_list_latency_ms() -> u64 {
    800
}

const fn default_mutation_latency_ms() -> u64 {
    500
}

const fn default_seed() -> bool {
    true
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            list_latency_ms: default_list_latency_ms(),
            mutation_latency_ms: default_mutation_latency_ms(),
            seed: default_seed(),
        }
    }
}

impl MockConfig {
    /// Latency settings for the mock repository.
    pub const fn latency(&self) -> Latency {
        Latency {
            list: Duration::from_millis(self.list_latency_ms),
            mutation: Duration::from_millis(self.mutation_latency_ms),
        }
    }
}
