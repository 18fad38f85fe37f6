//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Marketplace fees are percentages with sub-cent results:                │
//! │    R$ 70,00 × 12,5% = R$ 8,75                                           │
//! │    R$ 33,33 × 11,35% = R$ 3,782955                                      │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                             │
//! │    Exact base-10 arithmetic at full precision internally,              │
//! │    rounded to cents only when a figure is presented                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use lucro_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(10000); // R$ 100,00
//!
//! // Arithmetic operations
//! let total = price + Money::from_cents(450); // R$ 104,50
//! assert_eq!(total.to_string(), "R$ 104,50");
//! ```

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Rate;
use crate::validation::{require_finite, require_in_range};

/// Number of decimal places shown for currency and percentages.
pub const DISPLAY_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in Brazilian Reais, held as an exact decimal.
///
/// ## Design Decisions
/// - **Decimal, not f64**: no cent-level drift
/// - **Signed**: losses and degenerate negative inputs are representable
/// - **Full precision until presentation**: call [`Money::round_cents`]
///   only on figures that are shown to the user
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  CalculationInputs.sale_price ──┬──► commission (× channel rate)       │
/// │                                 ├──► tax (× regime rate)               │
/// │                                 └──► margin denominator                │
/// │                                                                         │
/// │  costs + fixed fee ──► break-even numerator                            │
/// │                                                                         │
/// │  CostBreakdown ──► net_profit ──► summary text "R$ 16,00"              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(as = "String")] Decimal);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use lucro_core::money::Money;
    ///
    /// let fee = Money::from_cents(650); // R$ 6,50
    /// assert_eq!(fee.to_string(), "R$ 6,50");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, DISPLAY_PLACES))
    }

    /// Wraps an arbitrary-precision decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Converts a raw `f64` (JSON number, CLI flag) into Money.
    ///
    /// ## Errors
    /// NaN and ±∞ are rejected with [`ValidationError::NotFinite`].
    /// Finite values keep their shortest decimal representation, so
    /// `10.5_f64` becomes exactly `10.5`.
    pub fn try_from_f64(field: &str, value: f64) -> Result<Self, ValidationError> {
        let value = require_finite(field, value)?;

        Decimal::from_f64(value)
            .map(Money)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: format!("{} is out of range", value),
            })
    }

    /// Parses a Brazilian-formatted currency string.
    ///
    /// Accepts `"1.234,56"`, `"1234,56"`, `"R$ 1.234,56"` and `"-R$ 5,00"`.
    /// Dots are thousands separators and the comma is the decimal mark.
    /// Blank input is zero (an untouched form field).
    ///
    /// ## Example
    /// ```rust
    /// use lucro_core::money::Money;
    ///
    /// let price = Money::parse_brl("R$ 1.234,56").unwrap();
    /// assert_eq!(price, Money::from_cents(123456));
    /// assert!(Money::parse_brl("abc").is_err());
    /// ```
    pub fn parse_brl(value: &str) -> Result<Self, ValidationError> {
        let cleaned: String = value
            .replace("R$", "")
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.')
            .map(|c| if c == ',' { '.' } else { c })
            .collect();

        if cleaned.is_empty() {
            return Ok(Money::zero());
        }

        Decimal::from_str(&cleaned)
            .map(Money)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("'{}' is not a currency amount", value.trim()),
            })
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Rounds to whole cents, midpoint away from zero (R$ 0,125 → R$ 0,13).
    ///
    /// The result always carries two decimal places so it serializes as
    /// `"16.00"` rather than `"16"`.
    pub fn round_cents(&self) -> Self {
        Money(round_display(self.0))
    }

    /// Applies a percentage rate to this amount at full precision.
    ///
    /// Returns `None` when the product does not fit in a `Decimal`.
    ///
    /// ## Example
    /// ```rust
    /// use lucro_core::money::Money;
    /// use lucro_core::types::Rate;
    ///
    /// let price = Money::from_cents(7000);         // R$ 70,00
    /// let commission = price.percent(Rate::from_bps(1250)); // 12,5%
    /// assert_eq!(commission, Some(Money::from_cents(875)));
    /// ```
    #[inline]
    pub fn percent(&self, rate: Rate) -> Option<Money> {
        self.0.checked_mul(rate.fraction()).map(Money)
    }

    /// Expresses `self` as a percentage of `whole`.
    ///
    /// `Some(0)` when `whole` is zero; `None` when the ratio overflows.
    pub fn percent_of(&self, whole: Money) -> Option<Decimal> {
        if whole.is_zero() {
            return Some(Decimal::ZERO);
        }
        self.0
            .checked_div(whole.0)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    }

    /// Addition that returns `None` instead of panicking on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtraction that returns `None` instead of panicking on overflow.
    #[inline]
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Sums `amounts`, failing with [`ValidationError::OutOfRange`] on
    /// overflow.
    ///
    /// ## Example
    /// ```rust
    /// use lucro_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let total = Money::try_sum("totalCosts", [Money::from_cents(100), Money::from_cents(250)]);
    /// assert_eq!(total.unwrap(), Money::from_cents(350));
    ///
    /// let huge = Money::from_decimal(Decimal::MAX);
    /// assert!(Money::try_sum("totalCosts", [huge, huge]).is_err());
    /// ```
    pub fn try_sum<I>(field: &str, amounts: I) -> Result<Money, ValidationError>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts.into_iter().try_fold(Money::zero(), |total, amount| {
            require_in_range(field, total.checked_add(amount))
        })
    }
}

/// Rounds a decimal to [`DISPLAY_PLACES`], midpoint away from zero.
pub fn round_display(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(DISPLAY_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_PLACES);
    rounded
}

/// Formats a percentage the Brazilian way: `16,00%`.
///
/// ## Example
/// ```rust
/// use lucro_core::money::format_percent;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_percent(Decimal::new(1234, 2)), "12,34%");
/// assert_eq!(format_percent(Decimal::new(85, 1)), "8,50%");
/// ```
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", round_display(value).to_string().replace('.', ","))
}

/// Inserts `.` every three digits from the right: `1234567` → `1.234.567`.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Brazilian Real format: `R$ 1.234,56`, negatives as `-R$ 16,00`.
///
/// Always rounds to cents; use [`Money::amount`] for the exact value.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = round_display(self.0);
        let sign = if rounded < Decimal::ZERO { "-" } else { "" };
        let text = rounded.abs().to_string();
        let (units, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        write!(f, "{}R$ {},{}", sign, group_thousands(units), cents)
    }
}

/// Panics on overflow, like `Decimal`. The calculation path uses
/// [`Money::checked_add`] instead.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), dec!(10.99));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "R$ 10,99");
        assert_eq!(Money::from_cents(500).to_string(), "R$ 5,00");
        assert_eq!(Money::from_cents(-1600).to_string(), "-R$ 16,00");
        assert_eq!(Money::zero().to_string(), "R$ 0,00");
        assert_eq!(Money::from_cents(123456).to_string(), "R$ 1.234,56");
        assert_eq!(Money::from_cents(100000000).to_string(), "R$ 1.000.000,00");
    }

    #[test]
    fn test_display_rounds_sub_cent_amounts() {
        assert_eq!(Money::from_decimal(dec!(3.782955)).to_string(), "R$ 3,78");
        assert_eq!(Money::from_decimal(dec!(0.125)).to_string(), "R$ 0,13");
        // Rounds to zero: no "-R$ 0,00"
        assert_eq!(Money::from_decimal(dec!(-0.001)).to_string(), "R$ 0,00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a + b, Money::from_cents(1500));
        assert_eq!(a - b, Money::from_cents(500));
        assert_eq!(-a, Money::from_cents(-1000));

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total, Money::from_cents(2000));
    }

    #[test]
    fn test_round_cents_keeps_two_places() {
        let rounded = Money::from_decimal(dec!(16)).round_cents();
        assert_eq!(rounded.amount().to_string(), "16.00");

        let rounded = Money::from_decimal(dec!(52.631578947)).round_cents();
        assert_eq!(rounded.amount().to_string(), "52.63");

        let rounded = Money::from_decimal(dec!(-0.125)).round_cents();
        assert_eq!(rounded.amount(), dec!(-0.13));
    }

    #[test]
    fn test_percent() {
        let price = Money::from_cents(10000);
        assert_eq!(price.percent(Rate::from_bps(2000)), Some(Money::from_cents(2000)));
        assert_eq!(price.percent(Rate::from_bps(50)), Some(Money::from_cents(50)));
        assert_eq!(price.percent(Rate::from_bps(1135)), Some(Money::from_cents(1135)));
    }

    #[test]
    fn test_percent_overflow_is_none() {
        let price = Money::from_cents(100_000_000);
        let rate = Rate::from_percent(Decimal::MAX);
        assert_eq!(price.percent(rate), None);
    }

    #[test]
    fn test_percent_of_guards_zero() {
        let profit = Money::from_cents(-6000);
        assert_eq!(profit.percent_of(Money::zero()), Some(Decimal::ZERO));

        let profit = Money::from_cents(425);
        assert_eq!(profit.percent_of(Money::from_cents(5000)), Some(dec!(8.5)));
    }

    #[test]
    fn test_percent_of_overflow_is_none() {
        let loss = Money::from_decimal(Decimal::MIN);
        assert_eq!(loss.percent_of(Money::from_cents(1)), None);
    }

    #[test]
    fn test_checked_arithmetic() {
        let max = Money::from_decimal(Decimal::MAX);
        let min = Money::from_decimal(Decimal::MIN);

        assert_eq!(max.checked_add(Money::from_cents(100)), None);
        assert_eq!(min.checked_sub(Money::from_cents(100)), None);
        assert_eq!(
            Money::from_cents(1000).checked_sub(Money::from_cents(1600)),
            Some(Money::from_cents(-600))
        );

        let err = Money::try_sum("totalCosts", [max, Money::from_cents(100)]).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field } if field == "totalCosts"));
    }

    #[test]
    fn test_try_from_f64() {
        let money = Money::try_from_f64("salePrice", 10.5).unwrap();
        assert_eq!(money, Money::from_cents(1050));

        assert!(matches!(
            Money::try_from_f64("salePrice", f64::NAN),
            Err(ValidationError::NotFinite { .. })
        ));
        assert!(Money::try_from_f64("salePrice", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_parse_brl() {
        assert_eq!(Money::parse_brl("1.234,56").unwrap(), Money::from_cents(123456));
        assert_eq!(Money::parse_brl("1234,56").unwrap(), Money::from_cents(123456));
        assert_eq!(Money::parse_brl("R$ 1.234,56").unwrap(), Money::from_cents(123456));
        assert_eq!(Money::parse_brl("-R$ 5,00").unwrap(), Money::from_cents(-500));
        assert_eq!(Money::parse_brl("  ").unwrap(), Money::zero());
        assert!(Money::parse_brl("dez reais").is_err());
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(16)), "16,00%");
        assert_eq!(format_percent(dec!(-120)), "-120,00%");
        assert_eq!(format_percent(dec!(27.505)), "27,51%");
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::from_cents(1600)).unwrap();
        assert_eq!(json, "\"16.00\"");

        let parsed: Money = serde_json::from_str("\"6.5\"").unwrap();
        assert_eq!(parsed, Money::from_cents(650));
    }
}
