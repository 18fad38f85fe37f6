//! # Domain Types
//!
//! Core domain types used throughout the profit calculator.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Channel      │   │ CalculationIn-  │   │ CalculationRe-  │       │
//! │  │  ─────────────  │   │     puts        │   │     sult        │       │
//! │  │  Shopee         │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Marketplace-   │   │  sale_price     │   │  net_profit     │       │
//! │  │   Classic       │──►│  costs × 3      │──►│  margin_percent │       │
//! │  │  Marketplace-   │   │  channel        │   │  break_even     │       │
//! │  │   Premium       │   │  tax_regime     │   │  breakdown      │       │
//! │  │  DirectPix      │   │  gateway fee    │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │      Rate       │  percentage as a decimal: 12.5 = 12,5%           │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every value here is built fresh per calculation and never mutated after
//! the result is returned.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::tax::TaxRegime;

// =============================================================================
// Rate
// =============================================================================

/// A percentage rate (commission, gateway fee, tax).
///
/// ## Why Percent, Not Fraction?
/// Sellers think in "12,5%", and fee tables are published that way.
/// [`Rate::fraction`] gives the multiplier when one is needed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Rate(#[ts(as = "String")] Decimal);

impl Rate {
    /// Creates a rate from a percentage (20 = 20%).
    #[inline]
    pub const fn from_percent(percent: Decimal) -> Self {
        Rate(percent)
    }

    /// Creates a rate from basis points (1250 = 12,5%).
    #[inline]
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::new(i64::from(bps), 2))
    }

    /// Converts a raw `f64` percentage, rejecting NaN and ±∞.
    pub fn try_from_f64(field: &str, percent: f64) -> Result<Self, ValidationError> {
        Money::try_from_f64(field, percent).map(|m| Rate(m.amount()))
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a multiplier (12,5% → 0.125).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(Decimal::ZERO)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the rate is below zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

/// Brazilian style, trailing zeros dropped: `20%`, `12,5%`, `0,5%`.
impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize().to_string().replace('.', ","))
    }
}

// =============================================================================
// Channel
// =============================================================================

/// A sales venue whose fee policy applies to the sale.
///
/// Closed on purpose: adding a channel means adding a variant here and a
/// policy to [`FeeTable::standard`](crate::fees::FeeTable::standard), and
/// every `match` in the crate is checked for exhaustiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    /// Shopee: percentage commission plus a flat fee on every sale.
    Shopee,
    /// Mercado Livre "Clássico" listing.
    #[serde(alias = "marketplace-classico", alias = "mercadolivre-classico")]
    MarketplaceClassic,
    /// Mercado Livre "Premium" listing.
    #[serde(alias = "mercadolivre-premium")]
    MarketplacePremium,
    /// Direct sale paid by Pix through a payment intermediary.
    #[serde(alias = "direct", alias = "pix")]
    DirectPix,
}

impl Channel {
    /// Every channel, in display order.
    pub const ALL: [Channel; 4] = [
        Channel::Shopee,
        Channel::MarketplaceClassic,
        Channel::MarketplacePremium,
        Channel::DirectPix,
    ];

    /// Canonical channel key, as used on the wire.
    pub const fn key(&self) -> &'static str {
        match self {
            Channel::Shopee => "shopee",
            Channel::MarketplaceClassic => "marketplace-classic",
            Channel::MarketplacePremium => "marketplace-premium",
            Channel::DirectPix => "direct-pix",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Parses canonical keys and the aliases the web forms have used.
///
/// ## Example
/// ```rust
/// use lucro_core::types::Channel;
///
/// assert_eq!("shopee".parse::<Channel>().unwrap(), Channel::Shopee);
/// assert_eq!("pix".parse::<Channel>().unwrap(), Channel::DirectPix);
/// assert!("shoppe".parse::<Channel>().is_err());
/// ```
impl FromStr for Channel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shopee" => Ok(Channel::Shopee),
            "marketplace-classic" | "marketplace-classico" | "mercadolivre-classico" => {
                Ok(Channel::MarketplaceClassic)
            }
            "marketplace-premium" | "mercadolivre-premium" => Ok(Channel::MarketplacePremium),
            "direct-pix" | "direct" | "pix" => Ok(Channel::DirectPix),
            _ => Err(CoreError::InvalidChannel(s.trim().to_string())),
        }
    }
}

// =============================================================================
// Calculation Inputs
// =============================================================================

/// One sale to evaluate.
///
/// Costs are not clamped: negative values are accepted and flow through
/// the math. Use [`validate_strict_inputs`](crate::validation::validate_strict_inputs)
/// to reject them at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInputs {
    /// Price the buyer pays.
    pub sale_price: Money,

    /// Cost of the product itself.
    pub cost_of_goods: Money,

    /// Packaging cost per unit.
    pub packaging_cost: Money,

    /// Shipping cost paid by the seller.
    pub shipping_cost: Money,

    /// Where the sale happens.
    pub channel: Channel,

    /// Per-sale tax treatment.
    pub tax_regime: TaxRegime,

    /// Payment intermediary percentage; only read for gateway channels.
    #[serde(default)]
    pub gateway_fee_percent: Option<Rate>,
}

impl CalculationInputs {
    /// Creates inputs with zero costs, MEI taxation and the default gateway fee.
    pub fn new(channel: Channel, sale_price: Money) -> Self {
        CalculationInputs {
            sale_price,
            cost_of_goods: Money::zero(),
            packaging_cost: Money::zero(),
            shipping_cost: Money::zero(),
            channel,
            tax_regime: TaxRegime::FlatExempt,
            gateway_fee_percent: None,
        }
    }

    /// Sets product, packaging and shipping costs.
    pub fn with_costs(mut self, cost_of_goods: Money, packaging: Money, shipping: Money) -> Self {
        self.cost_of_goods = cost_of_goods;
        self.packaging_cost = packaging;
        self.shipping_cost = shipping;
        self
    }

    /// Sets the tax regime.
    pub fn with_tax_regime(mut self, regime: TaxRegime) -> Self {
        self.tax_regime = regime;
        self
    }

    /// Sets the gateway fee for direct channels.
    pub fn with_gateway_fee(mut self, rate: Rate) -> Self {
        self.gateway_fee_percent = Some(rate);
        self
    }

    /// Costs that do not scale with the sale price, excluding channel fees.
    pub fn item_costs(&self) -> Result<Money, ValidationError> {
        Money::try_sum(
            "itemCosts",
            [self.cost_of_goods, self.packaging_cost, self.shipping_cost],
        )
    }
}

// =============================================================================
// Cost Breakdown
// =============================================================================

/// Every cost component of a sale, each rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub cost_of_goods: Money,
    pub packaging_cost: Money,
    pub shipping_cost: Money,
    /// Channel commission (percentage of the sale price).
    pub commission: Money,
    /// Flat per-sale channel fee; zero when waived.
    pub fixed_fee: Money,
    /// Per-sale tax; zero under MEI.
    pub tax: Money,
}

impl CostBreakdown {
    /// Sum of every component.
    pub fn total(&self) -> Result<Money, ValidationError> {
        Money::try_sum(
            "totalCosts",
            [
                self.cost_of_goods,
                self.packaging_cost,
                self.shipping_cost,
                self.commission,
                self.fixed_fee,
                self.tax,
            ],
        )
    }

    /// Commission plus fixed fee: what the channel keeps.
    pub fn marketplace_fees(&self) -> Result<Money, ValidationError> {
        Money::try_sum("marketplaceFees", [self.commission, self.fixed_fee])
    }
}

// =============================================================================
// Calculation Result
// =============================================================================

/// Outcome of one profit calculation.
///
/// ## Invariants
/// - `total_costs == breakdown.total()?`
/// - `net_profit == sale_price - total_costs` exactly
/// - `margin_percent == 0` when `sale_price == 0`
/// - `break_even_price` is `None` when commission + tax ≥ 100%
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub sale_price: Money,
    pub total_costs: Money,
    /// Commission plus fixed fee.
    pub marketplace_fees: Money,
    pub net_profit: Money,
    /// Net profit as a percentage of the sale price, two decimal places.
    #[ts(as = "String")]
    pub margin_percent: Decimal,
    /// Price at which net profit is zero; `None` when undefined.
    pub break_even_price: Option<Money>,
    /// Display name of the channel ("Shopee").
    pub channel_label: String,
    /// Human description of the fees applied ("Shopee: 20% + R$ 4,00").
    pub fee_description: String,
    pub breakdown: CostBreakdown,
}

impl CalculationResult {
    /// True when the sale makes money.
    pub fn is_profitable(&self) -> bool {
        self.net_profit > Money::zero()
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
    fn test_rate_from_bps() {
        let rate = Rate::from_bps(1250);
        assert_eq!(rate.percent(), dec!(12.5));
        assert_eq!(rate.fraction(), dec!(0.125));
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::from_bps(2000).to_string(), "20%");
        assert_eq!(Rate::from_bps(1250).to_string(), "12,5%");
        assert_eq!(Rate::from_bps(50).to_string(), "0,5%");
        assert_eq!(Rate::from_bps(1135).to_string(), "11,35%");
    }

    #[test]
    fn test_rate_try_from_f64() {
        assert_eq!(Rate::try_from_f64("taxRate", 6.0).unwrap(), Rate::from_bps(600));
        assert!(Rate::try_from_f64("taxRate", f64::NAN).is_err());
    }

    #[test]
    fn test_channel_parsing() {
        assert_eq!("shopee".parse::<Channel>().unwrap(), Channel::Shopee);
        assert_eq!(
            "marketplace-classico".parse::<Channel>().unwrap(),
            Channel::MarketplaceClassic
        );
        assert_eq!(
            " Mercadolivre-Premium ".parse::<Channel>().unwrap(),
            Channel::MarketplacePremium
        );
        assert_eq!("direct".parse::<Channel>().unwrap(), Channel::DirectPix);

        let err = "amazon".parse::<Channel>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidChannel(ref key) if key == "amazon"));
    }

    #[test]
    fn test_channel_serde_keys() {
        let json = serde_json::to_string(&Channel::MarketplaceClassic).unwrap();
        assert_eq!(json, "\"marketplace-classic\"");

        let parsed: Channel = serde_json::from_str("\"pix\"").unwrap();
        assert_eq!(parsed, Channel::DirectPix);
    }

    #[test]
    fn test_channel_keys_round_trip_through_from_str() {
        for channel in Channel::ALL {
            assert_eq!(channel.key().parse::<Channel>().unwrap(), channel);
        }
    }

    #[test]
    fn test_breakdown_total() {
        let breakdown = CostBreakdown {
            cost_of_goods: Money::from_cents(4000),
            packaging_cost: Money::from_cents(500),
            shipping_cost: Money::from_cents(1500),
            commission: Money::from_cents(2000),
            fixed_fee: Money::from_cents(400),
            tax: Money::zero(),
        };
        assert_eq!(breakdown.total().unwrap(), Money::from_cents(8400));
        assert_eq!(breakdown.marketplace_fees().unwrap(), Money::from_cents(2400));
    }

    #[test]
    fn test_breakdown_total_overflow() {
        let breakdown = CostBreakdown {
            cost_of_goods: Money::from_decimal(Decimal::MAX),
            packaging_cost: Money::zero(),
            shipping_cost: Money::zero(),
            commission: Money::from_decimal(Decimal::MAX),
            fixed_fee: Money::zero(),
            tax: Money::zero(),
        };
        assert!(matches!(
            breakdown.total(),
            Err(ValidationError::OutOfRange { ref field }) if field == "totalCosts"
        ));
        assert!(breakdown.marketplace_fees().is_ok());
    }

    #[test]
    fn test_inputs_builder() {
        let inputs = CalculationInputs::new(Channel::Shopee, Money::from_cents(10000))
            .with_costs(
                Money::from_cents(4000),
                Money::from_cents(500),
                Money::from_cents(1500),
            );
        assert_eq!(inputs.item_costs().unwrap(), Money::from_cents(6000));
        assert_eq!(inputs.tax_regime, TaxRegime::FlatExempt);
        assert!(inputs.gateway_fee_percent.is_none());
    }
}
