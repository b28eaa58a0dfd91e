use std::path::PathBuf;
use std::time::Duration;

use quire_client::{ClientConfig, DEFAULT_API_URL};

/// Client configuration from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub data_path: PathBuf,
    pub timeout: Duration,
    pub client: ClientConfig,
}

impl Config {
    /// Load configuration from environment variables.
    /// QUIRE_API_URL defaults to "http://localhost:5000/api"
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("QUIRE_API_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "QUIRE_API_URL",
                "must start with http:// or https://",
            ));
        }

        let data_path = lookup("QUIRE_DATA_PATH")
            .unwrap_or_else(|| "./quire.redb".to_string())
            .into();

        let timeout_secs = match lookup("QUIRE_TIMEOUT_SECS") {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|&secs| secs > 0)
                .ok_or(ConfigError::Invalid(
                    "QUIRE_TIMEOUT_SECS",
                    "must be a positive number of seconds",
                ))?,
            None => 10,
        };

        let refetch_on_missing_after_update = match lookup("QUIRE_REFETCH_ON_MISSING_AFTER_UPDATE")
        {
            Some(s) => parse_flag(&s).ok_or(ConfigError::Invalid(
                "QUIRE_REFETCH_ON_MISSING_AFTER_UPDATE",
                "must be true or false",
            ))?,
            None => false,
        };

        Ok(Config {
            api_url,
            data_path,
            timeout: Duration::from_secs(timeout_secs),
            client: ClientConfig {
                refetch_on_missing_after_update,
            },
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid(&'static str, &'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Invalid(var, msg) => write!(f, "Invalid value for {}: {}", var, msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.data_path, PathBuf::from("./quire.redb"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(!config.client.refetch_on_missing_after_update);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("QUIRE_API_URL", "https://blog.example.com/api"),
            ("QUIRE_DATA_PATH", "/tmp/q.redb"),
            ("QUIRE_TIMEOUT_SECS", "30"),
            ("QUIRE_REFETCH_ON_MISSING_AFTER_UPDATE", "TRUE"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "https://blog.example.com/api");
        assert_eq!(config.data_path, PathBuf::from("/tmp/q.redb"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.client.refetch_on_missing_after_update);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("QUIRE_API_URL", "localhost:5000")]),
            Err(ConfigError::Invalid("QUIRE_API_URL", _))
        ));
        assert!(matches!(
            load(&[("QUIRE_TIMEOUT_SECS", "0")]),
            Err(ConfigError::Invalid("QUIRE_TIMEOUT_SECS", _))
        ));
        assert!(matches!(
            load(&[("QUIRE_REFETCH_ON_MISSING_AFTER_UPDATE", "maybe")]),
            Err(ConfigError::Invalid("QUIRE_REFETCH_ON_MISSING_AFTER_UPDATE", _))
        ));
    }
}
