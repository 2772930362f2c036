//! Client configuration at `~/.wsecho/config.toml`.
//!
//! Every field has a default, so a missing or partial file is fine.
//! CLI flags always override config file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use wsecho_client::DEFAULT_ENDPOINT;

/// Top-level config file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Where to connect.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// WebSocket URL of the echo server.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Connect as soon as the UI starts.
    #[serde(default)]
    pub auto_connect: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            auto_connect: false,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Log file path. Defaults to `~/.wsecho/wsecho.log`.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// `~/.wsecho`, or `./.wsecho` when there is no home directory.
pub fn config_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".wsecho")
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn default_log_path() -> PathBuf {
    config_dir().join("wsecho.log")
}

impl Config {
    /// Load configuration from a TOML file, returning defaults if the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Effective endpoint: the CLI flag wins over the config file.
    pub fn endpoint(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .unwrap_or_else(|| self.connection.endpoint.clone())
    }

    /// Effective log file: the CLI flag wins, then the config file, then the
    /// default location.
    pub fn log_file(&self, cli: Option<&str>) -> PathBuf {
        cli.or(self.log.file.as_deref())
            .map(PathBuf::from)
            .unwrap_or_else(default_log_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let cfg = Config::default();
        assert_eq!(cfg.connection.endpoint, "ws://127.0.0.1:8008");
        assert!(!cfg.connection.auto_connect);
        assert!(cfg.log.file.is_none());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[connection]
endpoint = "ws://echo.local:9000"
auto_connect = true

[log]
file = "/tmp/wsecho-test.log"
"#;
        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.connection.endpoint, "ws://echo.local:9000");
        assert!(cfg.connection.auto_connect);
        assert_eq!(cfg.log.file.as_deref(), Some("/tmp/wsecho-test.log"));
    }

    #[test]
    fn parse_partial_toml_config() {
        let cfg: Config = toml::from_str("[log]\nfile = \"x.log\"\n").unwrap();
        assert_eq!(cfg.connection.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.log.file.as_deref(), Some("x.log"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.connection.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[connection]\nendpoint = \"wss://example.com/ws\"").unwrap();
        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.connection.endpoint, "wss://example.com/ws");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[connection\nendpoint = ").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config"));
    }

    #[test]
    fn cli_overrides_config() {
        let mut cfg = Config::default();
        cfg.connection.endpoint = "ws://from-config:1".into();
        cfg.log.file = Some("config.log".into());

        assert_eq!(cfg.endpoint(None), "ws://from-config:1");
        assert_eq!(cfg.endpoint(Some("ws://from-cli:2")), "ws://from-cli:2");
        assert_eq!(cfg.log_file(None), PathBuf::from("config.log"));
        assert_eq!(cfg.log_file(Some("cli.log")), PathBuf::from("cli.log"));
        assert_eq!(Config::default().log_file(None), default_log_path());
    }
}
