//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use baucis_docs::{CustomizationOptions, OpenApiOptions, DEFAULT_RELEASE};
use baucis_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// Server configuration section.
///
/// Controls the HTTP listener and where the document is mounted.
///
/// # Example
///
/// ```
/// use baucis_config::ServerSection;
///
/// let config = ServerSection {
///     http_addr: "127.0.0.1:8012".to_string(),
///     mount_path: "/api/v1".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// HTTP server bind address (e.g., "0.0.0.0:8012").
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Path prefix under which `openapi.json` is served.
    #[serde(default = "default_mount_path")]
    pub mount_path: String,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            mount_path: default_mount_path(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:8012".to_string()
}

fn default_mount_path() -> String {
    "/api".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30000
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
        }
    }
}

impl LoggingSection {
    /// The runtime logging configuration for this section.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            ansi: self.ansi_enabled,
            ..LogConfig::default()
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// One advertised server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerEntry {
    /// Server URL.
    pub url: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Document customization section.
///
/// Unset fields fall back to the generator defaults: title `api`, the
/// generic description, a single `/api` server and `info.version` equal to
/// the requested release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocsSection {
    /// Release served when a request names none.
    #[serde(default = "default_release")]
    pub default_release: String,

    /// API title.
    #[serde(default)]
    pub title: Option<String>,

    /// API version. Pins `info.version` for every release when set.
    #[serde(default)]
    pub version: Option<String>,

    /// API description.
    #[serde(default)]
    pub description: Option<String>,

    /// Terms of service URL.
    #[serde(default)]
    pub terms_of_service: Option<String>,

    /// Advertised servers.
    #[serde(default)]
    pub servers: Vec<ServerEntry>,
}

impl Default for DocsSection {
    fn default() -> Self {
        Self {
            default_release: default_release(),
            title: None,
            version: None,
            description: None,
            terms_of_service: None,
            servers: Vec::new(),
        }
    }
}

impl DocsSection {
    /// Converts the section into customization options.
    ///
    /// ```
    /// use baucis_config::DocsSection;
    ///
    /// let docs = DocsSection {
    ///     title: Some("Garden".to_string()),
    ///     ..Default::default()
    /// };
    /// let info = docs.to_options().info.unwrap();
    /// assert_eq!(info.title.as_deref(), Some("Garden"));
    /// assert!(info.version.is_none());
    /// ```
    pub fn to_options(&self) -> CustomizationOptions {
        let mut builder = OpenApiOptions::new();
        if let Some(title) = &self.title {
            builder = builder.title(title);
        }
        if let Some(version) = &self.version {
            builder = builder.version(version);
        }
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        if let Some(terms) = &self.terms_of_service {
            builder = builder.terms_of_service(terms);
        }
        for server in &self.servers {
            builder = builder.add_server(&server.url, server.description.as_deref(), None);
        }

        // The builder's placeholder title and version would shadow the
        // generator defaults.
        let mut options = builder.build();
        if let Some(info) = options.info.as_mut() {
            if self.title.is_none() {
                info.title = None;
            }
            if self.version.is_none() {
                info.version = None;
            }
        }
        options
    }
}

fn default_release() -> String {
    DEFAULT_RELEASE.to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_section_default() {
        let config = ServerSection::default();
        assert_eq!(config.http_addr, "0.0.0.0:8012");
        assert_eq!(config.mount_path, "/api");
        assert_eq!(config.shutdown_timeout_secs, 30);
        assert_eq!(config.request_timeout_ms, 30000);
    }

    #[test]
    fn test_server_section_deserialize() {
        let toml = r#"
            http_addr = "127.0.0.1:3000"
            mount_path = "/docs"
        "#;
        let config: ServerSection = toml::from_str(toml).unwrap();
        assert_eq!(config.http_addr, "127.0.0.1:3000");
        assert_eq!(config.mount_path, "/docs");
        assert_eq!(config.shutdown_timeout_secs, 30);
    }

    #[test]
    fn test_server_section_unknown_field_rejected() {
        let toml = r#"
            http_addr = "127.0.0.1:3000"
            max_connections = 10
        "#;
        let result: Result<ServerSection, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_logging_section_to_log_config() {
        let section = LoggingSection {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            ansi_enabled: true,
            ..Default::default()
        };
        let config = section.to_log_config();
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.ansi);
        assert!(config.enabled);
    }

    #[test]
    fn test_docs_section_default() {
        let docs = DocsSection::default();
        assert_eq!(docs.default_release, "0.0.1");
        assert!(docs.servers.is_empty());

        let options = docs.to_options();
        let info = options.info.unwrap();
        assert!(info.title.is_none());
        assert!(info.version.is_none());
        assert!(options.servers.is_none());
    }

    #[test]
    fn test_docs_section_to_options() {
        let docs = DocsSection {
            title: Some("Garden".to_string()),
            version: Some("3.14.15".to_string()),
            description: Some("Vegetables and more".to_string()),
            terms_of_service: Some("http://example.com/tos".to_string()),
            servers: vec![ServerEntry {
                url: "http://api.example.com".to_string(),
                description: Some("prod".to_string()),
            }],
            ..Default::default()
        };
        let options = docs.to_options();
        let info = options.info.unwrap();
        assert_eq!(info.title.as_deref(), Some("Garden"));
        assert_eq!(info.version.as_deref(), Some("3.14.15"));
        assert_eq!(info.description.as_deref(), Some("Vegetables and more"));
        assert_eq!(info.terms_of_service.as_deref(), Some("http://example.com/tos"));

        let servers = options.servers.unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].url, "http://api.example.com");
        assert_eq!(servers[0].description.as_deref(), Some("prod"));
    }

    #[test]
    fn test_docs_section_deserialize() {
        let toml = r#"
            default_release = "2.0.0"
            title = "Garden"

            [[servers]]
            url = "/api"
        "#;
        let docs: DocsSection = toml::from_str(toml).unwrap();
        assert_eq!(docs.default_release, "2.0.0");
        assert_eq!(docs.servers[0].url, "/api");
        assert!(docs.servers[0].description.is_none());
    }
}
