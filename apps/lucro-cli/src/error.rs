//! # API Error Type
//!
//! Unified error type for calculation requests.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in lucro-cli                              │
//! │                                                                         │
//! │  JSON body / CLI flags                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  RequestHandler::handle                                          │  │
//! │  │  Result<CalculationResponse, ApiError>                           │  │
//! │  │         │                                                        │  │
//! │  │  Bad JSON? ─────── serde_json::Error ─────────────┐             │  │
//! │  │         │                                          │             │  │
//! │  │  Bad input? ────── CoreError / ValidationError ── ApiError ─────►│  │
//! │  │         │                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: { "code": "INVALID_CHANNEL", "message": "..." }   exit 1      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use lucro_core::{CoreError, ValidationError};
use serde::Serialize;

use crate::config::ConfigError;

/// Error returned to the caller of a calculation.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INVALID_CHANNEL",
///   "message": "Unknown sales channel: shoppe"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown channel key (400)
    InvalidChannel,

    /// Percent-of-sale regime without a usable rate (400)
    InvalidTaxConfiguration,

    /// Input validation failed (400)
    ValidationError,

    /// Body is not a valid calculation request (400)
    MalformedRequest,

    /// Fee table or settings are unusable (500)
    ConfigurationError,

    /// Anything else (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status a web front end should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::InvalidChannel
            | ErrorCode::InvalidTaxConfiguration
            | ErrorCode::ValidationError
            | ErrorCode::MalformedRequest => 400,
            ErrorCode::ConfigurationError | ErrorCode::Internal => 500,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a malformed request error.
    pub fn malformed(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::MalformedRequest, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// See [`ErrorCode::http_status`].
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::InvalidChannel(_) => ApiError::new(ErrorCode::InvalidChannel, message),
            CoreError::InvalidTaxConfiguration { .. } => {
                ApiError::new(ErrorCode::InvalidTaxConfiguration, message)
            }
            CoreError::InvalidFeePolicy { .. } => {
                tracing::error!("Fee table rejected at request time: {}", message);
                ApiError::new(ErrorCode::ConfigurationError, message)
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::malformed(format!("Invalid request body: {}", err))
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigurationError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
