//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{
    default_console_name, default_console_rank, default_console_room, default_server_name,
};
use super::limits::{DispatchConfig, SearchConfig};
use super::rooms::{BroadcastConfig, RoomsConfig};
use crate::state::Rank;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub broadcast: BroadcastConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub rooms: RoomsConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// Local user for the console driver.
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name used as the sender of system notices.
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

/// Game data configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    /// Path to the JSON catalog. Without it searches run on an empty catalog.
    pub catalog: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset (default: "info").
    pub filter: Option<String>,
}

/// The user the console driver acts as.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_console_name")]
    pub name: String,
    #[serde(default = "default_console_rank")]
    pub rank: Rank,
    /// Room the console user joins (created if missing).
    #[serde(default = "default_console_room")]
    pub room: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            name: default_console_name(),
            rank: default_console_rank(),
            room: default_console_room(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.name, "dexchat");
        assert_eq!(config.dispatch.max_depth, 10);
        assert_eq!(config.search.display_cap, 10);
        assert_eq!(config.broadcast.cooldown_ms, 3000);
        assert_eq!(config.rooms.rank_ceiling, Rank::Leader);
        assert_eq!(config.console.rank, Rank::Owner);
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert!(config.data.catalog.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            r#"
            [server]
            name = "Showdown"

            [dispatch]
            max_depth = 4

            [broadcast]
            cooldown_ms = 0

            [rooms]
            rank_ceiling = "moderator"

            [[rooms.room]]
            title = "Lobby"
            rules = "https://example.org/rules"
            auth = { alice = "driver" }

            [log]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.name, "Showdown");
        assert_eq!(config.dispatch.max_depth, 4);
        assert!(config.broadcast.cooldown().is_none());
        assert_eq!(config.rooms.rank_ceiling, Rank::Moderator);
        assert_eq!(config.rooms.rooms.len(), 1);
        assert_eq!(config.rooms.rooms[0].auth.get("alice"), Some(&Rank::Driver));
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn unknown_rank_is_a_parse_error() {
        let err = Config::parse("[console]\nrank = \"emperor\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search]\ndisplay_cap = 5").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.search.display_cap, 5);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/dexchat.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
