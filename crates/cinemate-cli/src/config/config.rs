//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `credentials.api_key`.
pub const API_KEY_ENV: &str = "CINEMATE_API_KEY";

/// Environment variable overriding `credentials.pass_key`.
pub const PASSKEY_ENV: &str = "CINEMATE_PASSKEY";

/// Placeholder shown instead of a secret.
const MASK: &str = "***";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// API credentials.
    #[serde(default)]
    pub credentials: CredentialsConfig,
    /// HTTP client settings.
    #[serde(default)]
    pub client: ClientConfig,
}

/// Credential configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CredentialsConfig {
    /// Developer API key (catalog commands).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Account pass-key (account commands).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_key: Option<String>,
}

/// HTTP client configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Delay before each request, in milliseconds.
    #[serde(default = "default_call_delay_ms")]
    pub call_delay_ms: u64,
    /// User-Agent override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    String::from(cinemate_api::DEFAULT_BASE_URL)
}

fn default_call_delay_ms() -> u64 {
    u64::try_from(cinemate_api::DEFAULT_CALL_DELAY.as_millis()).unwrap_or(1000)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            call_delay_ms: default_call_delay_ms(),
            user_agent: None,
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Applies credential overrides from `lookup` (usually `std::env::var`).
    ///
    /// Empty values are ignored.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
        if let Some(key) = non_empty(API_KEY_ENV) {
            self.credentials.api_key = Some(key);
        }
        if let Some(key) = non_empty(PASSKEY_ENV) {
            self.credentials.pass_key = Some(key);
        }
        self
    }

    /// Returns a copy with secrets replaced by a placeholder.
    #[must_use]
    pub fn masked(&self) -> Self {
        Self {
            credentials: CredentialsConfig {
                api_key: self.credentials.api_key.as_ref().map(|_| String::from(MASK)),
                pass_key: self
                    .credentials
                    .pass_key
                    .as_ref()
                    .map(|_| String::from(MASK)),
            },
            client: ClientConfig {
                base_url: self.client.base_url.clone(),
                call_delay_ms: self.client.call_delay_ms,
                user_agent: self.client.user_agent.clone(),
            },
        }
    }
}
