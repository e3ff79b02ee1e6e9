//! # Baucis
//!
//! **OpenAPI 3.0 documents for baucis-style REST controllers**
//!
//! Baucis turns the controllers a REST layer exposes for its models into a
//! single OpenAPI 3.0 document:
//!
//! - one schema per model, honoring field selection
//! - instance and collection paths with fixed operation ids
//! - a shared parameter catalog and validation error schemas
//! - per-release documents chosen by the `API-Version` header
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use baucis::prelude::*;
//!
//! let mut registry = ControllerRegistry::new();
//! registry.register(ResourceController::new(
//!     "vegetable",
//!     SchemaDescriptor::new().field(Field::string("name").required()),
//! ))?;
//!
//! let cache = DocumentCache::new(OpenApiOptions::new().title("Garden").build());
//! let doc = cache.versioned(&registry, registry.default_release())?;
//! println!("{}", doc.to_json_pretty()?);
//! ```
//!
//! ## Crates
//!
//! ```text
//! baucis-docs       translator, operations, assembler, cache
//! baucis-server     GET <mount>/openapi.json, /health
//! baucis-config     TOML/JSON/env configuration
//! baucis-telemetry  structured logging
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod app;

// Re-export document generation
pub use baucis_docs as docs;

// Re-export server types
pub use baucis_server as server;

// Re-export configuration
pub use baucis_config as config;

// Re-export telemetry
pub use baucis_telemetry as telemetry;

/// Version of the baucis crates.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used types.
pub mod prelude {
    pub use baucis_config::{BaucisConfig, ConfigLoader};
    pub use baucis_docs::{
        ControllerRegistry, ControllerSource, DocsError, DocsResult, DocumentCache, Field,
        FieldKind, OpenApi, OpenApiOptions, PrimitiveType, ResourceController, SchemaDescriptor,
    };
    pub use baucis_server::{DocsServer, ServerConfig, ShutdownSignal};
}
