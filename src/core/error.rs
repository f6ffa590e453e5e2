//! Typed error handling for the query engine
//!
//! Every expected failure of a request is a variant of [`EngineError`], returned
//! as a value rather than raised. The HTTP boundary turns it into a status code
//! and a `{ "error": "<message>" }` body.
//!
//! # Example
//!
//! ```rust,ignore
//! match engine.execute(&mut store, request, &ids) {
//!     Ok(outcome) => println!("{}", outcome.into_value()),
//!     Err(EngineError::RecordNotFound { resource, id }) => {
//!         println!("no {} in {}", id, resource);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type of the engine and its HTTP boundary
#[derive(Debug)]
pub enum EngineError {
    /// The first path segment names no collection of the store
    ResourceNotFound { resource: String },

    /// The identifier is absent from an otherwise valid collection
    RecordNotFound { resource: String, id: String },

    /// The HTTP method is not one of GET/POST/PUT/PATCH/DELETE
    InvalidMethod { method: String },

    /// A required part of the request is missing or unusable
    MalformedInput { message: String },

    /// The persistence layer failed to write the store back
    Storage(StorageError),

    /// Unexpected failure (should not happen in normal operation)
    Internal(String),
}

impl EngineError {
    pub fn resource_not_found(resource: impl Into<String>) -> Self {
        EngineError::ResourceNotFound {
            resource: resource.into(),
        }
    }

    pub fn record_not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        EngineError::RecordNotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        EngineError::MalformedInput {
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ResourceNotFound { resource } => {
                write!(f, "Resource '{}' not found", resource)
            }
            EngineError::RecordNotFound { resource, id } => {
                write!(f, "Item '{}' not found in '{}'", id, resource)
            }
            EngineError::InvalidMethod { method } => {
                write!(f, "Method {} not allowed", method)
            }
            EngineError::MalformedInput { message } => {
                write!(f, "Malformed input: {}", message)
            }
            EngineError::Storage(e) => write!(f, "{}", e),
            EngineError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

/// Error body sent to HTTP clients
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl EngineError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            EngineError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::RecordNotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::InvalidMethod { .. } => StatusCode::METHOD_NOT_ALLOWED,
            EngineError::MalformedInput { .. } => StatusCode::BAD_REQUEST,
            EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EngineError::ResourceNotFound { .. } => "RESOURCE_NOT_FOUND",
            EngineError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            EngineError::InvalidMethod { .. } => "INVALID_METHOD",
            EngineError::MalformedInput { .. } => "MALFORMED_INPUT",
            EngineError::Storage(_) => "STORAGE_ERROR",
            EngineError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Server-side failures get a generic message; their detail stays in logs.
    pub fn to_response(&self) -> ErrorResponse {
        let error = if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        ErrorResponse { error }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "Request failed");
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised while persisting the store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store lock poisoned: {0}")]
    Lock(String),
}

impl From<StorageError> for EngineError {
    fn from(err: StorageError) -> Self {
        EngineError::Storage(err)
    }
}
