//! Typed error handling for the BizTime API
//!
//! Every storage operation and handler returns a [`BizResult`]. Business
//! failures (missing rows, constraint conflicts, malformed input) are plain
//! values of [`BizError`], so handlers branch on the kind instead of
//! intercepting panics or opaque errors.
//!
//! # Error Categories
//!
//! - [`BizError::BadRequest`]: malformed or missing input (400)
//! - [`BizError::NotFound`]: referenced key absent, zero rows affected (404)
//! - [`BizError::Conflict`]: unique or restrict constraint violated (409)
//! - [`BizError::Internal`]: unexpected storage fault (500)
//!
//! Backend faults are described by [`StorageError`] and always surface to
//! clients as `Internal` with a generic message. The detail is only logged.
//!
//! # Example
//!
//! ```rust,ignore
//! match store.get_company("acme").await? {
//!     Some(company) => Ok(Json(company)),
//!     None => Err(BizError::company_not_found("acme")),
//! }
//! ```

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for the BizTime API
#[derive(Debug)]
pub enum BizError {
    /// Malformed or missing input
    BadRequest {
        message: String,
        fields: Vec<FieldValidationError>,
    },

    /// Referenced key absent
    NotFound { message: String },

    /// Unique-constraint or restrict violation
    Conflict { message: String },

    /// Unexpected fault; the payload is logged, never returned
    Internal(String),
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
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

impl fmt::Display for BizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BizError::BadRequest { message, fields } if fields.is_empty() => {
                write!(f, "{}", message)
            }
            BizError::BadRequest { message, fields } => {
                let msgs: Vec<String> = fields
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "{}: {}", message, msgs.join(", "))
            }
            BizError::NotFound { message } => write!(f, "{}", message),
            BizError::Conflict { message } => write!(f, "{}", message),
            BizError::Internal(detail) => write!(f, "Internal error: {}", detail),
        }
    }
}

impl std::error::Error for BizError {}

impl BizError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        BizError::BadRequest {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        BizError::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        BizError::Conflict {
            message: message.into(),
        }
    }

    /// Request body failed field validation
    pub fn invalid_fields(fields: Vec<FieldValidationError>) -> Self {
        BizError::BadRequest {
            message: "Validation failed".to_string(),
            fields,
        }
    }

    pub fn company_not_found(code: &str) -> Self {
        Self::not_found(format!("Company with code '{}' not found", code))
    }

    pub fn company_exists(code: &str) -> Self {
        Self::conflict(format!("Company with code '{}' already exists", code))
    }

    /// Company is still referenced by invoices or industry associations
    pub fn company_in_use(code: &str) -> Self {
        Self::conflict(format!(
            "Company with code '{}' still has invoices or industries",
            code
        ))
    }

    /// Foreign key on `comp_code` does not resolve
    pub fn unknown_company(code: &str) -> Self {
        Self::bad_request(format!("Company with code '{}' does not exist", code))
    }

    pub fn invoice_not_found(id: i32) -> Self {
        Self::not_found(format!("Invoice {} not found", id))
    }

    pub fn invalid_amount(amt: f64) -> Self {
        Self::bad_request(format!("Invoice amount must be positive (got {})", amt))
    }

    pub fn industry_not_found(code: &str) -> Self {
        Self::not_found(format!("Industry with code '{}' not found", code))
    }

    pub fn industry_exists(code: &str) -> Self {
        Self::conflict(format!("Industry with code '{}' already exists", code))
    }

    pub fn association_exists(comp_code: &str, ind_code: &str) -> Self {
        Self::conflict(format!(
            "Company '{}' is already associated with industry '{}'",
            comp_code, ind_code
        ))
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BizError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            BizError::NotFound { .. } => StatusCode::NOT_FOUND,
            BizError::Conflict { .. } => StatusCode::CONFLICT,
            BizError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BizError::BadRequest { .. } => "BAD_REQUEST",
            BizError::NotFound { .. } => "NOT_FOUND",
            BizError::Conflict { .. } => "CONFLICT",
            BizError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BizError::NotFound { .. })
    }

    /// Convert to an error response
    ///
    /// Internal details never leave the process.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            BizError::BadRequest { message, .. }
            | BizError::NotFound { message }
            | BizError::Conflict { message } => message.clone(),
            BizError::Internal(_) => "Internal server error".to_string(),
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            BizError::BadRequest { fields, .. } if !fields.is_empty() => {
                Some(serde_json::json!({ "fields": fields }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for BizError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            BizError::Internal(detail) => tracing::error!(error = %detail, "request failed"),
            other => tracing::debug!(status = %status, error = %other, "request rejected"),
        }
        (status, Json(self.to_response())).into_response()
    }
}

/// A specialized Result type for BizTime operations
pub type BizResult<T> = Result<T, BizError>;

// =============================================================================
// Storage Errors
// =============================================================================

/// Faults raised by storage backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to connect to {backend}: {message}")]
    Connection {
        backend: &'static str,
        message: String,
    },

    #[error("{backend} query error: {message}")]
    Query {
        backend: &'static str,
        message: String,
    },

    #[error("transaction error: {message}")]
    Transaction { message: String },

    #[error("schema setup failed: {message}")]
    Schema { message: String },

    #[error("storage lock poisoned: {0}")]
    LockPoisoned(String),
}

impl From<StorageError> for BizError {
    fn from(err: StorageError) -> Self {
        BizError::Internal(err.to_string())
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for BizError {
    fn from(err: serde_json::Error) -> Self {
        BizError::bad_request(format!("Invalid JSON: {}", err))
    }
}

impl From<JsonRejection> for BizError {
    fn from(rejection: JsonRejection) -> Self {
        BizError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for BizError {
    fn from(rejection: PathRejection) -> Self {
        BizError::bad_request(rejection.body_text())
    }
}
