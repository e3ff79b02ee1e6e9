//! Error types for the documentation generation crate.
//!
//! Generation is forgiving about the shape of individual fields (an
//! unrecognized type degrades to a string property), so the errors here
//! cover the cases where no usable document can be produced at all.

use thiserror::Error;

/// Errors that can occur during documentation generation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize or deserialize a document or descriptor.
    #[error("Failed to serialize OpenAPI document: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A controller descriptor cannot be documented.
    #[error("Invalid controller '{resource}': {reason}")]
    InvalidController {
        /// Singular name of the offending resource (may be empty).
        resource: String,
        /// Why the controller was rejected.
        reason: String,
    },

    /// Two generated operations share an identifier.
    #[error("Duplicate operationId '{operation_id}'")]
    DuplicateOperationId {
        /// The colliding operation identifier.
        operation_id: String,
    },
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;
