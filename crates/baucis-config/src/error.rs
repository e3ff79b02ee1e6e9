//! Errors raised while assembling a [`BaucisConfig`](crate::BaucisConfig).
//!
//! Each variant names the layer that failed: the config file, a
//! `BAUCIS__*` override, or the merged result.

use std::path::PathBuf;
use thiserror::Error;

/// Why the service configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `--config` pointed at a file that does not exist.
    #[error("config file {path} does not exist")]
    FileNotFound {
        /// Path given on the command line.
        path: PathBuf,
    },

    /// The config file exists but could not be read.
    #[error("cannot read config file {path}")]
    ReadError {
        /// Path of the unreadable file.
        path: PathBuf,
        /// I/O failure from the read.
        #[source]
        source: std::io::Error,
    },

    /// The config file does not parse as TOML.
    #[error("config file is not valid TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The config file does not parse as JSON.
    #[error("config file is not valid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A single setting is out of range, e.g. a mount path without a
    /// leading slash or an unknown log format.
    #[error("invalid `{field}` setting: {reason}")]
    InvalidValue {
        /// Dotted key, such as `server.mount_path`.
        field: String,
        /// What the setting must look like.
        reason: String,
    },

    /// A `BAUCIS__SECTION__KEY` override could not be applied.
    #[error("environment override {var} rejected: {reason}")]
    EnvParseError {
        /// Full variable name.
        var: String,
        /// Expected value type.
        reason: String,
    },

    /// The merged layers do not form a usable configuration.
    #[error("unusable configuration: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Reports a missing config file.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Wraps an I/O failure reading `path`.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Rejects the setting at dotted key `field`.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Rejects the environment override `var`.
    pub fn env_parse_error(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EnvParseError {
            var: var.into(),
            reason: reason.into(),
        }
    }

    /// Rejects the merged configuration as a whole.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_file_names_path() {
        let err = ConfigError::file_not_found("demos/garden.toml");
        assert_eq!(err.to_string(), "config file demos/garden.toml does not exist");
    }

    #[test]
    fn test_bad_mount_path_names_setting() {
        let err = ConfigError::invalid_value("server.mount_path", "must start with '/'");
        assert_eq!(
            err.to_string(),
            "invalid `server.mount_path` setting: must start with '/'"
        );
    }

    #[test]
    fn test_rejected_override_names_variable() {
        let err = ConfigError::env_parse_error("BAUCIS__SERVER__REQUEST_TIMEOUT_MS", "expected integer");
        let message = err.to_string();
        assert!(message.starts_with("environment override BAUCIS__SERVER__REQUEST_TIMEOUT_MS"));
        assert!(message.ends_with("expected integer"));
    }

    #[test]
    fn test_unreadable_config_file_keeps_io_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::read_error("baucis.toml", io);
        assert_eq!(err.to_string(), "cannot read config file baucis.toml");

        let cause = std::error::Error::source(&err).unwrap();
        assert_eq!(cause.to_string(), "denied");
    }

    #[test]
    fn test_malformed_docs_section_is_toml_error() {
        let parsed: Result<toml::Value, _> = toml::from_str("[docs\ntitle = 1");
        let err = ConfigError::from(parsed.unwrap_err());
        assert!(matches!(err, ConfigError::TomlError(_)));
        assert!(err.to_string().starts_with("config file is not valid TOML"));
    }
}
