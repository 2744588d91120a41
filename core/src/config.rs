//! Client configuration from the environment.

use std::time::Duration;

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "CONSOLE_API_BASE_URL";
pub const TIMEOUT_MS_VAR: &str = "CONSOLE_API_TIMEOUT_MS";

/// Configurator REST endpoint used when nothing is set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:12345/v0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let base_url = get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let timeout = match get(TIMEOUT_MS_VAR) {
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    name: TIMEOUT_MS_VAR,
                    value: raw.clone(),
                })?;
                Some(Duration::from_millis(ms))
            }
            None => None,
        };

        Ok(Self { base_url, timeout })
    }
}
