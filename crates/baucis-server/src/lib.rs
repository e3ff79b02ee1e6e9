//! # Baucis Server
//!
//! HTTP endpoint serving generated OpenAPI documents.
//!
//! This crate provides:
//!
//! - `GET <mount>/openapi.json`, versioned by the `API-Version` header
//! - `GET /health` liveness reporting
//! - Graceful shutdown on SIGTERM/SIGINT or a programmatic signal
//!
//! Document generation itself lives in `baucis-docs`; the server only
//! picks the release and serializes what the shared
//! [`DocumentCache`](baucis_docs::DocumentCache) returns.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use baucis_docs::{ControllerRegistry, DocumentCache};
//! use baucis_server::{DocsServer, ServerConfig, ShutdownSignal};
//!
//! let server = DocsServer::new(
//!     ServerConfig::builder().mount_path("/api/v1").build(),
//!     Arc::new(ControllerRegistry::new()),
//!     Arc::new(DocumentCache::default()),
//! );
//! server.run_with_shutdown(ShutdownSignal::with_os_signals()).await?;
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
mod health;
pub mod server;
pub mod shutdown;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::ServerError;
pub use health::{HealthCheck, HealthStatus};
pub use server::{DocsServer, HttpResponse, ResponseBody, RELEASE_HEADER};
pub use shutdown::{ConnectionTracker, ShutdownSignal};
