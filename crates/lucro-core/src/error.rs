//! # Error Types
//!
//! Domain-specific error types for lucro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lucro-core errors (this file)                                         │
//! │  ├── CoreError        - Structurally invalid calculation requests      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  lucro-cli errors (app crate)                                          │
//! │  ├── ConfigError      - Configuration loading / fee table overrides    │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → JSON / exit code       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! A zero or negative sale price, costs above the price, or fee rates that
//! leave the break-even price undefined all produce a normal
//! [`CalculationResult`](crate::CalculationResult). A loss is a valid answer.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Only raised for structurally invalid input. The calculator is pure, so
/// none of these are retryable.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Channel key is unknown, or the active fee table has no policy for it.
    ///
    /// ## When This Occurs
    /// - A typo'd channel key in a request (`"shoppe"`)
    /// - A custom fee table that omits one of the channels
    ///
    /// Unknown channels never fall back to a zero-fee policy.
    #[error("Unknown sales channel: {0}")]
    InvalidChannel(String),

    /// Percent-of-sale regime selected without a usable rate.
    #[error("Invalid tax configuration: {reason}")]
    InvalidTaxConfiguration { reason: String },

    /// A fee policy violates its invariants (negative commission or fee).
    #[error("Invalid fee policy for {channel}: {reason}")]
    InvalidFeePolicy { channel: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the boundary where raw numbers and strings become
/// [`Money`](crate::Money) and [`Rate`](crate::Rate) values.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g. unparseable currency string).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// A value, or a figure derived from it, is too large to calculate with.
    #[error("{field} is out of range")]
    OutOfRange { field: String },

    /// NaN or infinity where a number was expected.
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: String, value: f64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
