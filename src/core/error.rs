//! Typed error handling for the lookup and browse pipeline
//!
//! The taxonomy is deliberately small and maps directly onto the HTTP
//! contract of the API:
//!
//! - [`ApiError::InvalidIdentifier`] — malformed BBID → 406
//! - [`ApiError::InvalidBrowseRequest`] — zero or several seed parameters → 406
//! - [`ApiError::NotFound`] — no matching entity → 404
//! - everything else → 5xx via a generic conversion
//!
//! Validation and loading stages translate failures into this taxonomy at
//! the boundary; error responses carry only a code, a message and optional
//! details, never partial data.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The error type threaded through every request stage
#[derive(Debug)]
pub enum ApiError {
    /// A path or query value that should be a BBID is not a valid UUID
    InvalidIdentifier { value: String },

    /// A browse request's query string did not name exactly one seed entity
    InvalidBrowseRequest { message: String },

    /// No entity matched a well-formed identifier
    NotFound { message: String },

    /// Configuration loading or validation failed
    Config(ConfigError),

    /// The backing store failed while answering a lookup
    Storage { message: String },

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidIdentifier { value } => {
                write!(f, "Invalid BBID: '{}'", value)
            }
            ApiError::InvalidBrowseRequest { message } => {
                write!(f, "Invalid browse request: {}", message)
            }
            ApiError::NotFound { message } => write!(f, "{}", message),
            ApiError::Config(e) => write!(f, "{}", e),
            ApiError::Storage { message } => write!(f, "Storage error: {}", message),
            ApiError::Internal(message) => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidIdentifier { .. } => StatusCode::NOT_ACCEPTABLE,
            ApiError::InvalidBrowseRequest { .. } => StatusCode::NOT_ACCEPTABLE,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            ApiError::InvalidBrowseRequest { .. } => "INVALID_BROWSE_REQUEST",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Config(_) => "CONFIG_ERROR",
            ApiError::Storage { .. } => "STORAGE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::InvalidIdentifier { value } => {
                Some(serde_json::json!({ "value": value }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for ApiError {
    fn from(err: serde_yaml::Error) -> Self {
        ApiError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

/// Store failures surface as anyhow errors; they are never user faults
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Storage {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for request-stage and handler code
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Tests
// =============================================================================
