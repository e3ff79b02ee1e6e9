//! Typed configuration for the Baucis OpenAPI document service.
//!
//! This crate provides a strongly-typed configuration system with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`BaucisConfig`] holds three sections:
//!
//! - [`ServerSection`] - listener address, mount path and timeouts
//! - [`LoggingSection`] - level, format and colors
//! - [`DocsSection`] - document metadata, turned into customization options
//!
//! # Example
//!
//! ```no_run
//! use baucis_config::ConfigLoader;
//!
//! # fn main() -> Result<(), baucis_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("baucis.toml")?
//!     .with_env_prefix("BAUCIS")
//!     .load()?;
//!
//! println!("Serving {}/openapi.json on {}", config.server.mount_path, config.server.http_addr);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8012"
//! mount_path = "/api"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [docs]
//! default_release = "0.0.1"
//! title = "Garden API"
//!
//! [[docs.servers]]
//! url = "https://garden.example.com/api"
//! description = "Production"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with variables of the form `PREFIX__SECTION__KEY`:
//!
//! - `BAUCIS__SERVER__HTTP_ADDR=0.0.0.0:9000`
//! - `BAUCIS__LOGGING__FORMAT=pretty`
//! - `BAUCIS__DOCS__SERVERS=/api,https://garden.example.com/api`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
