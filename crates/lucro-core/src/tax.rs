//! # Tax Regimes
//!
//! Per-sale tax for Brazilian small sellers.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FlatExempt (MEI)              PercentOfSale(rate) (Simples Nacional)  │
//! │  ─────────────────             ─────────────────────────────────────   │
//! │  tax per sale = 0              tax per sale = price × rate / 100       │
//! │  monthly DAS is NOT                                                    │
//! │  amortised per sale            typical rates 4% … 11,35%, not capped   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Rate;
use crate::validation::require_in_range;

// =============================================================================
// Tax Regime
// =============================================================================

/// How tax is charged on a single sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "regime", content = "rate", rename_all = "snake_case")]
pub enum TaxRegime {
    /// MEI: a fixed monthly levy, nothing per sale.
    #[default]
    FlatExempt,
    /// Simples Nacional style: a percentage of the sale price.
    PercentOfSale(Rate),
}

/// Regime selector as it arrives from a form, before a rate is attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    #[default]
    #[serde(alias = "mei")]
    FlatExempt,
    #[serde(alias = "simples_nacional", alias = "simples")]
    PercentOfSale,
}

impl TaxRegime {
    /// Builds a regime from a form selection and an optional raw rate.
    ///
    /// ## Rules
    /// - `FlatExempt` ignores the rate entirely
    /// - `PercentOfSale` requires a finite, non-negative rate
    ///
    /// ## Example
    /// ```rust
    /// use lucro_core::tax::{TaxMode, TaxRegime};
    ///
    /// assert!(TaxRegime::from_selection(TaxMode::PercentOfSale, Some(6.0)).is_ok());
    /// assert!(TaxRegime::from_selection(TaxMode::PercentOfSale, None).is_err());
    /// assert!(TaxRegime::from_selection(TaxMode::FlatExempt, None).is_ok());
    /// ```
    pub fn from_selection(mode: TaxMode, rate: Option<f64>) -> CoreResult<Self> {
        match mode {
            TaxMode::FlatExempt => Ok(TaxRegime::FlatExempt),
            TaxMode::PercentOfSale => {
                let raw = rate.ok_or_else(|| CoreError::InvalidTaxConfiguration {
                    reason: "percent_of_sale requires a rate".to_string(),
                })?;
                let rate = Rate::try_from_f64("taxRate", raw).map_err(|e| {
                    CoreError::InvalidTaxConfiguration {
                        reason: e.to_string(),
                    }
                })?;
                let regime = TaxRegime::PercentOfSale(rate);
                regime.validate()?;
                Ok(regime)
            }
        }
    }

    /// Rejects negative percent-of-sale rates.
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            TaxRegime::PercentOfSale(rate) if rate.is_negative() => {
                Err(CoreError::InvalidTaxConfiguration {
                    reason: format!("tax rate cannot be negative, got {}", rate.percent()),
                })
            }
            _ => Ok(()),
        }
    }

    /// The rate that scales with the sale price (zero under MEI).
    pub fn rate(&self) -> Rate {
        match self {
            TaxRegime::FlatExempt => Rate::zero(),
            TaxRegime::PercentOfSale(rate) => *rate,
        }
    }

    /// Whether this is the MEI regime.
    pub fn is_flat_exempt(&self) -> bool {
        matches!(self, TaxRegime::FlatExempt)
    }
}

/// Tax owed on one sale, at full precision.
///
/// A negative sale price yields a negative tax; that input is degenerate and
/// passed through rather than guarded. A product too large for a `Decimal`
/// fails with [`ValidationError::OutOfRange`](crate::ValidationError::OutOfRange).
///
/// ## Example
/// ```rust
/// use lucro_core::money::Money;
/// use lucro_core::tax::{compute_tax, TaxRegime};
/// use lucro_core::types::Rate;
///
/// let price = Money::from_cents(10000);
/// let tax = compute_tax(price, &TaxRegime::PercentOfSale(Rate::from_bps(600))).unwrap();
/// assert_eq!(tax, Money::from_cents(600));
/// ```
pub fn compute_tax(sale_price: Money, regime: &TaxRegime) -> CoreResult<Money> {
    regime.validate()?;
    match regime {
        TaxRegime::FlatExempt => Ok(Money::zero()),
        TaxRegime::PercentOfSale(rate) => {
            require_in_range("tax", sale_price.percent(*rate)).map_err(CoreError::from)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
