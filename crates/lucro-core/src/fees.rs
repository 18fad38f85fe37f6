//! # Marketplace Fee Policies
//!
//! The fee table is data, not code: one [`MarketplaceFeePolicy`] per
//! [`Channel`], built once at start-up and passed to the calculator.
//!
//! ## Standard Table (2026 rules)
//! ```text
//! ┌─────────────────────────┬──────────────────┬───────────┬──────────────┐
//! │ Channel                 │ Commission       │ Fixed fee │ Waived when  │
//! ├─────────────────────────┼──────────────────┼───────────┼──────────────┤
//! │ shopee                  │ 20% (14% + 6%)   │ R$ 4,00   │ never        │
//! │ marketplace-classic     │ 12,5%            │ R$ 6,50   │ price ≥ 79   │
//! │ marketplace-premium     │ 17,5%            │ R$ 6,50   │ price ≥ 79   │
//! │ direct-pix              │ caller (0,5%)    │ -         │ -            │
//! └─────────────────────────┴──────────────────┴───────────┴──────────────┘
//! ```
//!
//! ## Fee Resolution
//! ```text
//! resolve_fees(channel, price, gateway?)
//!      │
//!      ├── no policy for channel? → InvalidChannel
//!      │
//!      ├── Commission::Percent  → rate from table
//!      │        └── threshold set and price ≥ threshold? → fixed fee 0
//!      │
//!      └── Commission::Gateway  → caller's rate, else table default
//!               └── fixed fee always 0
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Channel, Rate};
use crate::validation::validate_rate;
use crate::{DEFAULT_GATEWAY_FEE_BPS, FIXED_FEE_WAIVER_THRESHOLD_CENTS};

// =============================================================================
// Commission
// =============================================================================

/// Where a channel's commission percentage comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Commission {
    /// Rate set by the platform.
    Percent { rate: Rate },
    /// Negotiable payment-intermediary rate supplied per request.
    Gateway { default_rate: Rate },
}

// =============================================================================
// Fee Policy
// =============================================================================

/// Fee rules for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceFeePolicy {
    /// Display name ("Mercado Livre Clássico").
    pub label: String,
    pub commission: Commission,
    /// Flat amount charged per sale. Ignored for gateway channels.
    pub fixed_fee: Money,
    /// Sale price at or above which the fixed fee is waived.
    pub fixed_fee_threshold: Option<Money>,
}

/// Fees that apply to one concrete sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuote {
    pub commission_percent: Rate,
    pub fixed_fee: Money,
    pub description: String,
}

impl MarketplaceFeePolicy {
    /// Platform-set commission plus a fixed fee on every sale.
    pub fn percent(label: impl Into<String>, rate: Rate, fixed_fee: Money) -> Self {
        MarketplaceFeePolicy {
            label: label.into(),
            commission: Commission::Percent { rate },
            fixed_fee,
            fixed_fee_threshold: None,
        }
    }

    /// Caller-supplied gateway percentage, no fixed fee.
    pub fn gateway(label: impl Into<String>, default_rate: Rate) -> Self {
        MarketplaceFeePolicy {
            label: label.into(),
            commission: Commission::Gateway { default_rate },
            fixed_fee: Money::zero(),
            fixed_fee_threshold: None,
        }
    }

    /// Waives the fixed fee when the sale price reaches `threshold`.
    pub fn with_threshold(mut self, threshold: Money) -> Self {
        self.fixed_fee_threshold = Some(threshold);
        self
    }

    /// Checks commission ≥ 0 and fixed fee ≥ 0.
    pub fn validate(&self, channel: Channel) -> CoreResult<()> {
        let rate = match self.commission {
            Commission::Percent { rate } => rate,
            Commission::Gateway { default_rate } => default_rate,
        };

        if rate.is_negative() {
            return Err(CoreError::InvalidFeePolicy {
                channel: channel.key().to_string(),
                reason: format!("commission cannot be negative, got {}", rate.percent()),
            });
        }

        if self.fixed_fee.is_negative() {
            return Err(CoreError::InvalidFeePolicy {
                channel: channel.key().to_string(),
                reason: format!("fixed fee cannot be negative, got {}", self.fixed_fee.amount()),
            });
        }

        Ok(())
    }

    /// The fixed fee charged at `sale_price`.
    ///
    /// Strictly below the threshold the fee applies; exactly at it, waived.
    pub fn fixed_fee_for(&self, sale_price: Money) -> Money {
        match self.fixed_fee_threshold {
            Some(threshold) if sale_price >= threshold => Money::zero(),
            _ => self.fixed_fee,
        }
    }

    /// Resolves the commission rate and fixed fee for one sale.
    pub fn quote(
        &self,
        sale_price: Money,
        gateway_fee_percent: Option<Rate>,
    ) -> CoreResult<FeeQuote> {
        match self.commission {
            Commission::Percent { rate } => {
                let fixed_fee = self.fixed_fee_for(sale_price);
                let description = if !fixed_fee.is_zero() {
                    format!("{}: {} + {}", self.label, rate, fixed_fee)
                } else if self.fixed_fee_threshold.is_some() && !self.fixed_fee.is_zero() {
                    format!("{}: {} + sem taxa fixa", self.label, rate)
                } else {
                    format!("{}: {}", self.label, rate)
                };

                Ok(FeeQuote {
                    commission_percent: rate,
                    fixed_fee,
                    description,
                })
            }
            Commission::Gateway { default_rate } => {
                let rate = gateway_fee_percent.unwrap_or(default_rate);
                validate_rate("gatewayFeePercent", rate)?;

                Ok(FeeQuote {
                    commission_percent: rate,
                    fixed_fee: Money::zero(),
                    description: format!("{}: {} intermediador", self.label, rate),
                })
            }
        }
    }
}

// =============================================================================
// Fee Table
// =============================================================================

/// Immutable channel → policy lookup.
///
/// ## Thread Safety
/// Read-only after construction; share it by reference (or inside the
/// calculator) across any number of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeTable {
    policies: BTreeMap<Channel, MarketplaceFeePolicy>,
}

impl FeeTable {
    /// A table with no channels; every lookup fails until policies are added.
    pub fn empty() -> Self {
        FeeTable {
            policies: BTreeMap::new(),
        }
    }

    /// The published 2026 marketplace rules.
    pub fn standard() -> Self {
        let threshold = Money::from_cents(FIXED_FEE_WAIVER_THRESHOLD_CENTS);
        let listing_fee = Money::from_cents(650);

        let policies = BTreeMap::from([
            (
                Channel::Shopee,
                // 14% base commission + 6% free-shipping programme
                MarketplaceFeePolicy::percent(
                    "Shopee",
                    Rate::from_bps(2000),
                    Money::from_cents(400),
                ),
            ),
            (
                Channel::MarketplaceClassic,
                MarketplaceFeePolicy::percent(
                    "Mercado Livre Clássico",
                    Rate::from_bps(1250),
                    listing_fee,
                )
                .with_threshold(threshold),
            ),
            (
                Channel::MarketplacePremium,
                MarketplaceFeePolicy::percent(
                    "Mercado Livre Premium",
                    Rate::from_bps(1750),
                    listing_fee,
                )
                .with_threshold(threshold),
            ),
            (
                Channel::DirectPix,
                MarketplaceFeePolicy::gateway(
                    "Pix / Venda Direta",
                    Rate::from_bps(DEFAULT_GATEWAY_FEE_BPS),
                ),
            ),
        ]);

        FeeTable { policies }
    }

    /// Adds or replaces the policy for `channel` after validating it.
    pub fn with_policy(
        mut self,
        channel: Channel,
        policy: MarketplaceFeePolicy,
    ) -> CoreResult<Self> {
        policy.validate(channel)?;
        self.policies.insert(channel, policy);
        Ok(self)
    }

    /// Sets the fallback rate of every gateway channel.
    pub fn with_default_gateway_fee(mut self, rate: Rate) -> CoreResult<Self> {
        for (channel, policy) in self.policies.iter_mut() {
            if let Commission::Gateway { default_rate } = &mut policy.commission {
                *default_rate = rate;
                policy.validate(*channel)?;
            }
        }
        Ok(self)
    }

    /// Looks up the policy for `channel`.
    pub fn policy(&self, channel: Channel) -> CoreResult<&MarketplaceFeePolicy> {
        self.policies
            .get(&channel)
            .ok_or_else(|| CoreError::InvalidChannel(channel.key().to_string()))
    }

    /// All configured channels in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &MarketplaceFeePolicy)> {
        self.policies.iter().map(|(channel, policy)| (*channel, policy))
    }

    /// Commission rate and fixed fee for one sale on `channel`.
    ///
    /// ## Example
    /// ```rust
    /// use lucro_core::fees::FeeTable;
    /// use lucro_core::money::Money;
    /// use lucro_core::types::{Channel, Rate};
    ///
    /// let table = FeeTable::standard();
    ///
    /// let quote = table
    ///     .resolve_fees(Channel::MarketplaceClassic, Money::from_cents(5000), None)
    ///     .unwrap();
    /// assert_eq!(quote.fixed_fee, Money::from_cents(650));
    ///
    /// let quote = table
    ///     .resolve_fees(Channel::MarketplaceClassic, Money::from_cents(7900), None)
    ///     .unwrap();
    /// assert!(quote.fixed_fee.is_zero());
    /// ```
    pub fn resolve_fees(
        &self,
        channel: Channel,
        sale_price: Money,
        gateway_fee_percent: Option<Rate>,
    ) -> CoreResult<FeeQuote> {
        self.policy(channel)?.quote(sale_price, gateway_fee_percent)
    }
}

impl Default for FeeTable {
    fn default() -> Self {
        FeeTable::standard()
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
    fn test_standard_table_is_valid() {
        let table = FeeTable::standard();
        for channel in Channel::ALL {
            let policy = table.policy(channel).unwrap();
            assert!(policy.validate(channel).is_ok());
        }
    }

    #[test]
    fn test_shopee_has_no_threshold() {
        let table = FeeTable::standard();
        for cents in [1000, 7900, 100000] {
            let quote = table
                .resolve_fees(Channel::Shopee, Money::from_cents(cents), None)
                .unwrap();
            assert_eq!(quote.commission_percent, Rate::from_bps(2000));
            assert_eq!(quote.fixed_fee, Money::from_cents(400));
        }
    }

    #[test]
    fn test_threshold_boundary() {
        let table = FeeTable::standard();
        for channel in [Channel::MarketplaceClassic, Channel::MarketplacePremium] {
            let below = table
                .resolve_fees(channel, Money::from_cents(7899), None)
                .unwrap();
            assert_eq!(below.fixed_fee, Money::from_cents(650));

            let at = table
                .resolve_fees(channel, Money::from_cents(7900), None)
                .unwrap();
            assert!(at.fixed_fee.is_zero());

            let above = table
                .resolve_fees(channel, Money::from_cents(10000), None)
                .unwrap();
            assert!(above.fixed_fee.is_zero());
        }
    }

    #[test]
    fn test_gateway_uses_caller_rate_or_default() {
        let table = FeeTable::standard();
        let price = Money::from_cents(10000);

        let quote = table.resolve_fees(Channel::DirectPix, price, None).unwrap();
        assert_eq!(quote.commission_percent, Rate::from_bps(50));
        assert!(quote.fixed_fee.is_zero());

        let quote = table
            .resolve_fees(Channel::DirectPix, price, Some(Rate::from_bps(100)))
            .unwrap();
        assert_eq!(quote.commission_percent, Rate::from_bps(100));

        let quote = table
            .resolve_fees(Channel::DirectPix, price, Some(Rate::zero()))
            .unwrap();
        assert!(quote.commission_percent.is_zero());
    }

    #[test]
    fn test_gateway_rate_ignored_for_platform_channels() {
        let table = FeeTable::standard();
        let quote = table
            .resolve_fees(Channel::Shopee, Money::from_cents(10000), Some(Rate::from_bps(100)))
            .unwrap();
        assert_eq!(quote.commission_percent, Rate::from_bps(2000));
    }

    #[test]
    fn test_negative_gateway_rate_rejected() {
        let table = FeeTable::standard();
        let result = table.resolve_fees(
            Channel::DirectPix,
            Money::from_cents(10000),
            Some(Rate::from_percent(dec!(-0.5))),
        );
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_descriptions() {
        let table = FeeTable::standard();

        let quote = table
            .resolve_fees(Channel::Shopee, Money::from_cents(10000), None)
            .unwrap();
        assert_eq!(quote.description, "Shopee: 20% + R$ 4,00");

        let quote = table
            .resolve_fees(Channel::MarketplaceClassic, Money::from_cents(10000), None)
            .unwrap();
        assert_eq!(quote.description, "Mercado Livre Clássico: 12,5% + sem taxa fixa");

        let quote = table
            .resolve_fees(Channel::MarketplacePremium, Money::from_cents(5000), None)
            .unwrap();
        assert_eq!(quote.description, "Mercado Livre Premium: 17,5% + R$ 6,50");

        let quote = table
            .resolve_fees(Channel::DirectPix, Money::from_cents(10000), None)
            .unwrap();
        assert_eq!(quote.description, "Pix / Venda Direta: 0,5% intermediador");
    }

    #[test]
    fn test_missing_channel_is_invalid() {
        let table = FeeTable::empty()
            .with_policy(
                Channel::Shopee,
                MarketplaceFeePolicy::percent(
                    "Shopee",
                    Rate::from_bps(2000),
                    Money::from_cents(400),
                ),
            )
            .unwrap();

        let err = table
            .resolve_fees(Channel::DirectPix, Money::from_cents(10000), None)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidChannel(ref key) if key == "direct-pix"));
    }

    #[test]
    fn test_with_policy_validates() {
        let bad =
            MarketplaceFeePolicy::percent("Bad", Rate::from_bps(1000), Money::from_cents(-100));
        assert!(matches!(
            FeeTable::standard().with_policy(Channel::Shopee, bad),
            Err(CoreError::InvalidFeePolicy { .. })
        ));
    }

    #[test]
    fn test_with_default_gateway_fee() {
        let table = FeeTable::standard()
            .with_default_gateway_fee(Rate::from_bps(80))
            .unwrap();
        let quote = table
            .resolve_fees(Channel::DirectPix, Money::from_cents(10000), None)
            .unwrap();
        assert_eq!(quote.commission_percent, Rate::from_bps(80));

        // Platform channels are untouched
        let quote = table
            .resolve_fees(Channel::Shopee, Money::from_cents(10000), None)
            .unwrap();
        assert_eq!(quote.commission_percent, Rate::from_bps(2000));

        assert!(FeeTable::standard()
            .with_default_gateway_fee(Rate::from_percent(dec!(-1)))
            .is_err());
    }

    #[test]
    fn test_iter_in_display_order() {
        let channels: Vec<Channel> = FeeTable::standard().iter().map(|(c, _)| c).collect();
        assert_eq!(channels, Channel::ALL.to_vec());
    }
}
