//! TOML configuration file parsing.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional so a partial file can be merged with CLI
/// arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// HTTP server section
    #[serde(default)]
    pub server: ServerSection,

    /// Outbound execution section
    #[serde(default)]
    pub executor: ExecutorSection,

    /// Store seeding section
    #[serde(default)]
    pub store: StoreSection,
}

/// HTTP server section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Listen address
    pub listen: Option<String>,

    /// Maximum inbound body size in bytes
    pub max_body_bytes: Option<usize>,
}

/// Outbound execution section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutorSection {
    /// Per-execution bound in seconds
    pub timeout: Option<u64>,
}

/// Store seeding section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// Fixture file loaded at startup
    pub fixtures: Option<PathBuf>,

    /// Request logs kept per webhook
    pub max_logs_per_webhook: Option<usize>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Volt engine configuration file

[server]
# Address to listen on (default: 127.0.0.1:8080)
listen = "127.0.0.1:8080"

# Maximum accepted inbound request body in bytes (default: 2 MiB)
# max_body_bytes = 2097152

[executor]
# Bound on one outbound request execution in seconds (default: 30)
timeout = 30

[store]
# JSON fixture file seeding workspaces, collections, requests and webhooks
# fixtures = "fixtures.json"

# Request logs kept per webhook; the oldest are dropped first (default: 1000)
# max_logs_per_webhook = 1000
"#
    .to_string()
}
