//! # Validation Module
//!
//! Boundary checks for raw calculator input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request decoding (lucro-cli)                                 │
//! │  ├── JSON / flag types (serde, clap)                                   │
//! │  └── require_finite, validate_required                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Optional strict mode                                         │
//! │  └── validate_strict_inputs: no negative price or costs                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculator                                                   │
//! │  ├── unknown channel → InvalidChannel                                  │
//! │  ├── bad tax rate    → InvalidTaxConfiguration                         │
//! │  └── overflow        → require_in_range (OutOfRange)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculator itself accepts zero and negative amounts. Strict mode is
//! for front ends that want to reject them before calculating.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CalculationInputs, Rate};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Scalar Validators
// =============================================================================

/// Rejects NaN and ±∞.
///
/// ## Example
/// ```rust
/// use lucro_core::validation::require_finite;
///
/// assert_eq!(require_finite("salePrice", 99.9).unwrap(), 99.9);
/// assert!(require_finite("salePrice", f64::NAN).is_err());
/// ```
pub fn require_finite(field: &str, value: f64) -> ValidationResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite {
            field: field.to_string(),
            value,
        })
    }
}

/// Turns the `None` of a checked operation into
/// [`ValidationError::OutOfRange`] for `field`.
///
/// ## Example
/// ```rust
/// use lucro_core::validation::require_in_range;
///
/// assert_eq!(require_in_range("total", 2_i64.checked_add(2)).unwrap(), 4);
/// assert!(require_in_range("total", i64::MAX.checked_add(1)).is_err());
/// ```
pub fn require_in_range<T>(field: &str, value: Option<T>) -> ValidationResult<T> {
    value.ok_or_else(|| ValidationError::OutOfRange {
        field: field.to_string(),
    })
}

/// Rejects blank strings, returning the trimmed value.
pub fn validate_required<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// Rejects amounts below zero.
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Rejects percentage rates below zero.
///
/// Rates above 100% are allowed; they only make break-even undefined.
pub fn validate_rate(field: &str, rate: Rate) -> ValidationResult<()> {
    if rate.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Input Validators
// =============================================================================

/// Strict-mode check: price, every cost and the gateway fee must be ≥ 0.
///
/// ## Example
/// ```rust
/// use lucro_core::validation::validate_strict_inputs;
/// use lucro_core::{CalculationInputs, Channel, Money};
///
/// let ok = CalculationInputs::new(Channel::Shopee, Money::from_cents(10000));
/// assert!(validate_strict_inputs(&ok).is_ok());
///
/// let refund = CalculationInputs::new(Channel::Shopee, Money::from_cents(-10000));
/// assert!(validate_strict_inputs(&refund).is_err());
/// ```
pub fn validate_strict_inputs(inputs: &CalculationInputs) -> ValidationResult<()> {
    validate_non_negative("salePrice", inputs.sale_price)?;
    validate_non_negative("costOfGoods", inputs.cost_of_goods)?;
    validate_non_negative("packagingCost", inputs.packaging_cost)?;
    validate_non_negative("shippingCost", inputs.shipping_cost)?;

    if let Some(rate) = inputs.gateway_fee_percent {
        validate_rate("gatewayFeePercent", rate)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
