//! Logging setup for the Baucis OpenAPI document service.
//!
//! Every crate in the workspace logs through `tracing` macros with
//! structured fields. This crate installs the subscriber that renders them:
//!
//! - **JSON** output by default, one object per event
//! - **Pretty** output for local development
//! - An `EnvFilter` built from a level or a full directive string
//!
//! # Example
//!
//! ```rust,ignore
//! use baucis_telemetry::{init_logging, LogConfig};
//!
//! fn main() -> Result<(), baucis_telemetry::TelemetryError> {
//!     init_logging(&LogConfig::default())?;
//!     tracing::info!(addr = "0.0.0.0:8012", "Serving documentation");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, is_log_level, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
