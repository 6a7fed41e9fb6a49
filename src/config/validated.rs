//! Validated configuration after merging CLI and TOML sources.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional
/// TOML config.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Address the HTTP server binds to
    pub listen: SocketAddr,

    /// Largest inbound request body accepted, in bytes
    pub max_body_bytes: usize,

    /// Bound on one outbound execution
    pub execute_timeout: Duration,

    /// Fixture file seeding the store, if any
    pub fixtures: Option<PathBuf>,

    /// Request logs kept per webhook
    pub max_logs_per_webhook: usize,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fixtures = self
            .fixtures
            .as_ref()
            .map_or_else(|| "none".to_string(), |p| p.display().to_string());

        write!(
            f,
            "Config {{ listen: {}, max_body_bytes: {}, execute_timeout: {}s, fixtures: {}, max_logs_per_webhook: {} }}",
            self.listen,
            self.max_body_bytes,
            self.execute_timeout.as_secs(),
            fixtures,
            self.max_logs_per_webhook,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The listen address does not parse
    /// - The body limit, the log cap or the execution timeout is zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let listen = Self::resolve_listen(cli, toml)?;
        let max_body_bytes = Self::resolve_max_body_bytes(cli, toml)?;
        let execute_timeout = Self::resolve_execute_timeout(cli, toml)?;
        let fixtures = Self::resolve_fixtures(cli, toml);
        let max_logs_per_webhook = Self::resolve_max_logs_per_webhook(cli, toml)?;

        Ok(Self {
            listen,
            max_body_bytes,
            execute_timeout,
            fixtures,
            max_logs_per_webhook,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_listen(cli: &Cli, toml: Option<&TomlConfig>) -> Result<SocketAddr, ConfigError> {
        let Some(value) = cli
            .listen
            .as_deref()
            .or_else(|| toml.and_then(|t| t.server.listen.as_deref()))
        else {
            return Ok(defaults::LISTEN);
        };

        value
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidListenAddress {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    fn resolve_max_body_bytes(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<usize, ConfigError> {
        let bytes = cli
            .max_body_bytes
            .or_else(|| toml.and_then(|t| t.server.max_body_bytes))
            .unwrap_or(defaults::MAX_BODY_BYTES);

        if bytes == 0 {
            return Err(ConfigError::InvalidLimit {
                field: "max_body_bytes",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(bytes)
    }

    fn resolve_execute_timeout(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        let seconds = cli
            .execute_timeout
            .or_else(|| toml.and_then(|t| t.executor.timeout))
            .unwrap_or(defaults::EXECUTE_TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "execute_timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_max_logs_per_webhook(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<usize, ConfigError> {
        let cap = cli
            .max_logs_per_webhook
            .or_else(|| toml.and_then(|t| t.store.max_logs_per_webhook))
            .unwrap_or(defaults::MAX_LOGS_PER_WEBHOOK);

        if cap == 0 {
            return Err(ConfigError::InvalidLimit {
                field: "max_logs_per_webhook",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(cap)
    }

    fn resolve_fixtures(cli: &Cli, toml: Option<&TomlConfig>) -> Option<PathBuf> {
        cli.fixtures
            .clone()
            .or_else(|| toml.and_then(|t| t.store.fixtures.clone()))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
