//! Configuration types for trello-mcp
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::util::SecretString;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Trello connection settings
    pub trello: TrelloConfig,

    /// Server/transport settings
    pub server: ServerConfig,

    /// Board access-control settings
    pub access_control: AccessControlConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Trello connection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrelloConfig {
    /// Trello API base URL
    pub url: String,

    /// API version path segment (default: "1")
    pub api_version: String,

    /// API key (prefer env var TRELLO_API_KEY)
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// API token (prefer env var TRELLO_TOKEN)
    #[serde(default)]
    pub token: Option<SecretString>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum retries for failed requests
    pub max_retries: u32,
}

impl Default for TrelloConfig {
    fn default() -> Self {
        Self {
            url: "https://api.trello.com".to_string(),
            api_version: "1".to_string(),
            api_key: None,
            token: None,
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl TrelloConfig {
    /// Get the full API base URL
    pub fn api_url(&self) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), self.api_version)
    }
}

/// Server/transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Transport mode
    pub transport: TransportMode,

    /// HTTP host (for http/sse transport)
    pub host: String,

    /// HTTP port (for http/sse transport)
    pub port: u16,

    /// Server name for MCP
    pub name: String,

    /// Server version for MCP
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: TransportMode::Stdio,
            host: "127.0.0.1".to_string(),
            port: 21902,
            name: "trello-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Transport mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Standard input/output (default, for Claude Code)
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events
    Http,
}

/// Board access-control configuration
///
/// `allowed_boards` holds canonical board identifiers or short links; each is
/// normalized once at first use. An empty list means every board is
/// authorized. That open-access default matches the behavior operators of
/// this server rely on, so it is kept; the loader logs a warning at startup
/// when no allow-list is configured so the choice is a conscious one.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AccessControlConfig {
    /// Board identifiers permitted for access (empty = unrestricted)
    pub allowed_boards: Vec<String>,

    /// Where the allow-list came from; filled in by the loader, not from TOML
    #[serde(skip)]
    pub provenance: Option<PolicyProvenance>,
}

impl AccessControlConfig {
    /// True when no allow-list is configured (open access)
    pub fn is_unrestricted(&self) -> bool {
        self.allowed_boards.is_empty()
    }
}

/// Provenance of the configured allow-list, for diagnostics and denial messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyProvenance {
    /// Source file path, when the allow-list came from a config file
    pub path: Option<String>,
    /// Source key: a TOML key path or an environment variable name
    pub key: String,
}

impl PolicyProvenance {
    /// The allow-list was read from a configuration file
    pub fn from_file(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            key: "access_control.allowed_boards".to_string(),
        }
    }

    /// The allow-list was read from the TRELLO_BOARD_IDS environment variable
    pub fn from_env() -> Self {
        Self {
            path: None,
            key: "TRELLO_BOARD_IDS".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trello_config_api_url() {
        let config = TrelloConfig {
            url: "https://api.trello.com".to_string(),
            api_version: "1".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "https://api.trello.com/1");

        // Trailing slash is tolerated
        let config = TrelloConfig {
            url: "https://api.trello.com/".to_string(),
            api_version: "1".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "https://api.trello.com/1");
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.trello.url, "https://api.trello.com");
        assert_eq!(config.trello.timeout_secs, 30);
        assert_eq!(config.server.transport, TransportMode::Stdio);
        assert!(config.access_control.is_unrestricted());
    }

    #[test]
    fn test_deserialize_transport_mode() {
        let mode: TransportMode = serde_json::from_str(r#""stdio""#).unwrap();
        assert_eq!(mode, TransportMode::Stdio);

        let mode: TransportMode = serde_json::from_str(r#""http""#).unwrap();
        assert_eq!(mode, TransportMode::Http);
    }

    #[test]
    fn test_provenance_keys() {
        let file = PolicyProvenance::from_file("/etc/trello-mcp/config.toml");
        assert_eq!(file.key, "access_control.allowed_boards");
        assert_eq!(file.path.as_deref(), Some("/etc/trello-mcp/config.toml"));

        let env = PolicyProvenance::from_env();
        assert_eq!(env.key, "TRELLO_BOARD_IDS");
        assert!(env.path.is_none());
    }
}
