use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the story backend
    #[serde(default = "default_api_host")]
    pub api_host: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_site_title")]
    pub site_title: String,
    /// Refresh interval in minutes, 0 disables the background refresh
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
    /// Backend request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_api_host() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_site_title() -> String {
    "Daily Digest".to_string()
}

fn default_refresh_interval() -> u64 {
    15
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_host: default_api_host(),
            bind_address: default_bind_address(),
            site_title: default_site_title(),
            refresh_interval: default_refresh_interval(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.normalize();
        Ok(config)
    }

    /// Apply `DIGEST_API_HOST` and `DIGEST_BIND_ADDRESS` on top of the file values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("DIGEST_API_HOST").ok(),
            std::env::var("DIGEST_BIND_ADDRESS").ok(),
        )
    }

    fn with_overrides(mut self, api_host: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(host) = api_host.filter(|h| !h.trim().is_empty()) {
            self.api_host = host;
        }
        if let Some(addr) = bind_address.filter(|a| !a.trim().is_empty()) {
            self.bind_address = addr;
        }
        self.normalize();
        self
    }

    fn normalize(&mut self) {
        let trimmed = self.api_host.trim().trim_end_matches('/');
        self.api_host = trimmed.to_string();
    }
}
