//! # Baucis Docs
//!
//! OpenAPI 3.0 document generation for schema-backed REST resource
//! controllers.
//!
//! This crate provides:
//! - **A collaborator data model**: schema descriptors, selection
//!   expressions and resource controllers
//! - **Schema translation** from field descriptors to component schemas
//! - **Operation synthesis** for the six CRUD operations of every resource
//! - **Document assembly** with customization overlays and per-release
//!   specializations
//! - **A document cache** safe to share between request handlers
//!
//! ## Quick Start
//!
//! ```
//! use baucis_docs::{
//!     ControllerRegistry, DocumentCache, Field, OpenApiOptions, ResourceController,
//!     SchemaDescriptor,
//! };
//!
//! let mut registry = ControllerRegistry::new();
//! registry.register(ResourceController::new(
//!     "vegetable",
//!     SchemaDescriptor::new()
//!         .field(Field::string("name").required())
//!         .field(Field::reference("related", "vegetable"))
//!         .with_document_keys(),
//! ))?;
//!
//! let cache = DocumentCache::new(OpenApiOptions::new().title("Garden").build());
//! let doc = cache.versioned(&registry, "0.0.1")?;
//!
//! assert!(doc.paths.contains_key("/vegetables/{id}"));
//! assert_eq!(doc.components.schemas["Vegetable"].required, vec!["name".to_string()]);
//! # Ok::<(), baucis_docs::DocsError>(())
//! ```

pub mod assembler;
pub mod cache;
pub mod controller;
mod error;
pub mod fragment;
pub mod model;
pub mod openapi;
pub mod operation;
pub mod options;
pub mod parameters;
pub mod selection;
pub mod translator;

pub use assembler::{base_path, generate_for_version, generate_root};
pub use cache::DocumentCache;
pub use controller::{
    capitalize, ControllerFragment, ControllerRegistry, ControllerSource, ResourceController,
    DEFAULT_RELEASE,
};
pub use error::{DocsError, DocsResult};
pub use model::{Field, FieldKind, OpaqueType, PrimitiveType, SchemaDescriptor};
pub use openapi::{
    Components, Contact, ExternalDocumentation, Info, License, MediaType, OAuthFlow, OAuthFlows,
    OpenApi, Operation, Parameter, ParameterIn, PathItem, RefOr, RequestBody, Response, Schema,
    SchemaType, SecurityRequirement, SecurityScheme, Server, ServerVariable, Tag,
};
pub use operation::{OperationMode, Verb};
pub use options::{CustomizationOptions, OpenApiOptions, ServerVariables};
pub use selection::Selection;
pub use translator::SchemaTranslator;
