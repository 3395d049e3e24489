use std::io::IsTerminal;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::blockcypher::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::constants::database::DEFAULT_DATABASE_URL;
use crate::constants::server::{DEFAULT_HOST, DEFAULT_PORT};
use crate::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub log_format: LogFormat,
    pub blockcypher: BlockCypherConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockCypherConfig {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
    #[cfg(feature = "mocks")]
    #[serde(default)]
    pub mock_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// PEM bundle used to verify the server certificate instead of the platform store
    #[serde(default)]
    pub tls_ca_file: Option<String>,
    #[cfg(feature = "mocks")]
    #[serde(default)]
    pub mock_mode: bool,
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Bunyan JSON, one object per line
    Json,
    /// Human-readable text
    Text,
    /// JSON when stdout is not a terminal, text otherwise
    #[default]
    Auto,
}

impl LogFormat {
    /// Resolve `Auto` into a concrete format by inspecting stdout
    pub fn resolve(self) -> Self {
        match self {
            LogFormat::Auto if std::io::stdout().is_terminal() => LogFormat::Text,
            LogFormat::Auto => LogFormat::Json,
            other => other,
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            "auto" => Ok(LogFormat::Auto),
            other => Err(format!(
                "unknown log format `{other}` (expected json, text or auto)"
            )),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        // these are just some sane defaults, most likely we will
        // have them overridden
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_format: LogFormat::Auto,
            blockcypher: BlockCypherConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
                #[cfg(feature = "mocks")]
                mock_mode: true,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                tls_ca_file: None,
                #[cfg(feature = "mocks")]
                mock_mode: true,
            },
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> std::io::Result<Self> {
        toml::from_str(contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Reject values that parse but cannot work at runtime
    pub fn validate(&self) -> Result<(), Error> {
        let base_url = &self.blockcypher.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "blockcypher.base_url must be an http(s) URL, got `{base_url}`"
            )));
        }
        if self.blockcypher.timeout_secs == Some(0) {
            return Err(Error::Config(
                "blockcypher.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.database.url.is_empty() {
            return Err(Error::Config("database.url must not be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_toml() {
        let config = Config::from_toml(
            r#"
            host = "0.0.0.0"
            port = 9000

            [blockcypher]
            base_url = "https://api.blockcypher.com/v1"
            timeout_secs = 10

            [database]
            url = "postgres://user:pass@db:5432/chain_sync"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_format, LogFormat::Auto);
        assert_eq!(config.blockcypher.timeout_secs, Some(10));
        assert_eq!(config.database.tls_ca_file, None);
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = Config::from_toml("port = \"not a number\"").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().expect("default config to be valid");
    }

    #[test]
    fn validation_rejects_unusable_values() {
        let mut config = Config::default();
        config.blockcypher.base_url = "api.blockcypher.com/v1".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.blockcypher.timeout_secs = Some(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.database.url.clear();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert!("yaml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Text.resolve(), LogFormat::Text);
        assert_ne!(LogFormat::Auto.resolve(), LogFormat::Auto);
    }
}
