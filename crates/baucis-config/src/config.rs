//! Main configuration types.
//!
//! This module provides the top-level [`BaucisConfig`] struct and its builder.

use std::net::SocketAddr;

use baucis_telemetry::{create_env_filter, is_log_level};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, DocsSection, LoggingSection, ServerSection};

/// Complete service configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use baucis_config::BaucisConfig;
///
/// let config = BaucisConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8012");
/// assert_eq!(config.docs.default_release, "0.0.1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct BaucisConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Document customization.
    #[serde(default)]
    pub docs: DocsSection,
}

impl BaucisConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> BaucisConfigBuilder {
        BaucisConfigBuilder::new()
    }

    /// The bind address as a socket address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the address does not parse.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.http_addr.parse().map_err(|_| {
            ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            )
        })
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The server address is not a socket address
    /// - The mount path lacks a leading `/` or has a trailing one
    /// - The log level is neither a level nor a filter directive
    /// - The default release is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        let mount = &self.server.mount_path;
        if !mount.starts_with('/') {
            return Err(ConfigError::invalid_value(
                "server.mount_path",
                format!("must start with '/': {mount}"),
            ));
        }
        if mount.len() > 1 && mount.ends_with('/') {
            return Err(ConfigError::invalid_value(
                "server.mount_path",
                format!("must not end with '/': {mount}"),
            ));
        }

        let level = &self.logging.level;
        let is_directive = level.contains('=') && create_env_filter(level).is_ok();
        if !is_log_level(level) && !is_directive {
            return Err(ConfigError::invalid_value(
                "logging.level",
                format!("expected trace, debug, info, warn, error or a filter directive: {level}"),
            ));
        }

        if self.docs.default_release.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "docs.default_release",
                "must not be empty",
            ));
        }

        Ok(())
    }

    /// Development preset: pretty debug logs on localhost.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.server.http_addr = "127.0.0.1:8012".to_string();
        config.logging.level = "debug".to_string();
        config.logging.format = baucis_telemetry::LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config
    }
}

/// Builder for [`BaucisConfig`].
#[derive(Debug, Default)]
pub struct BaucisConfigBuilder {
    server: Option<ServerSection>,
    logging: Option<LoggingSection>,
    docs: Option<DocsSection>,
}

impl BaucisConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server section.
    #[must_use]
    pub fn server(mut self, server: ServerSection) -> Self {
        self.server = Some(server);
        self
    }

    /// Set the logging section.
    #[must_use]
    pub fn logging(mut self, logging: LoggingSection) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Set the docs section.
    #[must_use]
    pub fn docs(mut self, docs: DocsSection) -> Self {
        self.docs = Some(docs);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> BaucisConfig {
        BaucisConfig {
            server: self.server.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
            docs: self.docs.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<BaucisConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
