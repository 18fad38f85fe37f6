//! # Profit Calculator
//!
//! Turns one [`CalculationInputs`] into one [`CalculationResult`].
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. resolve fees        FeeTable ─► commission %, fixed fee            │
//! │  2. commission          sale_price × commission %                      │
//! │  3. tax                 compute_tax(sale_price, regime)                │
//! │  4. breakdown           every component rounded to cents               │
//! │  5. total_costs         Σ breakdown                                     │
//! │  6. net_profit          sale_price − total_costs                       │
//! │  7. margin              net_profit / sale_price × 100 (0 if price 0)   │
//! │  8. break-even          full-precision fixed costs / (1 − c − t)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Break-even and the Fixed-Fee Threshold
//! The fixed fee is decided once, at the actual sale price, and that decision
//! is reused when solving for break-even. A R$ 100,00 Mercado Livre sale has
//! no fixed fee, so its break-even price is solved without one even if that
//! price lands below R$ 79,00.
//!
//! ## Thread Safety
//! `ProfitCalculator` holds only an immutable [`FeeTable`]. It is `Send +
//! Sync` and can be shared by reference across threads with no locking.

use rust_decimal::Decimal;

use crate::error::{CoreResult, ValidationError};
use crate::fees::{FeeQuote, FeeTable};
use crate::money::{round_display, Money};
use crate::tax::compute_tax;
use crate::types::{CalculationInputs, CalculationResult, Channel, CostBreakdown, Rate};
use crate::validation::require_in_range;

// =============================================================================
// Profit Calculator
// =============================================================================

/// Pure profit calculator over an injected fee table.
#[derive(Debug, Clone, Default)]
pub struct ProfitCalculator {
    fees: FeeTable,
}

impl ProfitCalculator {
    /// Creates a calculator that uses `fees` for every lookup.
    pub fn new(fees: FeeTable) -> Self {
        ProfitCalculator { fees }
    }

    /// The fee table in use.
    pub fn fee_table(&self) -> &FeeTable {
        &self.fees
    }

    /// See [`FeeTable::resolve_fees`].
    pub fn resolve_fees(
        &self,
        channel: Channel,
        sale_price: Money,
        gateway_fee_percent: Option<Rate>,
    ) -> CoreResult<FeeQuote> {
        self.fees.resolve_fees(channel, sale_price, gateway_fee_percent)
    }

    /// Computes profit, margin and break-even for one sale.
    ///
    /// ## Errors
    /// - [`CoreError::InvalidChannel`](crate::CoreError::InvalidChannel) when
    ///   the fee table has no policy for the channel
    /// - [`CoreError::InvalidTaxConfiguration`](crate::CoreError::InvalidTaxConfiguration)
    ///   for a negative tax rate
    /// - [`CoreError::Validation`](crate::CoreError::Validation) for a
    ///   negative gateway fee, or an amount so large that a figure derived
    ///   from it overflows (`OutOfRange`)
    ///
    /// Zero or negative prices and costs above the price are not errors.
    ///
    /// ## Example
    /// ```rust
    /// use lucro_core::{CalculationInputs, Channel, Money, ProfitCalculator};
    ///
    /// let inputs = CalculationInputs::new(Channel::Shopee, Money::from_cents(10000))
    ///     .with_costs(Money::from_cents(4000), Money::from_cents(500), Money::from_cents(1500));
    ///
    /// let result = ProfitCalculator::default().calculate_profit(&inputs).unwrap();
    /// assert_eq!(result.net_profit, Money::from_cents(1600));
    /// assert_eq!(result.break_even_price, Some(Money::from_cents(8000)));
    /// ```
    pub fn calculate_profit(&self, inputs: &CalculationInputs) -> CoreResult<CalculationResult> {
        let policy = self.fees.policy(inputs.channel)?;
        let quote = policy.quote(inputs.sale_price, inputs.gateway_fee_percent)?;

        let commission = require_in_range(
            "commission",
            inputs.sale_price.percent(quote.commission_percent),
        )?;
        let tax = compute_tax(inputs.sale_price, &inputs.tax_regime)?;

        let breakdown = CostBreakdown {
            cost_of_goods: inputs.cost_of_goods.round_cents(),
            packaging_cost: inputs.packaging_cost.round_cents(),
            shipping_cost: inputs.shipping_cost.round_cents(),
            commission: commission.round_cents(),
            fixed_fee: quote.fixed_fee.round_cents(),
            tax: tax.round_cents(),
        };

        let sale_price = inputs.sale_price.round_cents();
        let total_costs = breakdown.total()?;
        let net_profit = require_in_range("netProfit", sale_price.checked_sub(total_costs))?;
        let margin = require_in_range("marginPercent", net_profit.percent_of(sale_price))?;

        let fixed_costs = Money::try_sum("fixedCosts", [inputs.item_costs()?, quote.fixed_fee])?;
        let break_even =
            break_even_price(fixed_costs, quote.commission_percent, inputs.tax_regime.rate())?;

        Ok(CalculationResult {
            sale_price,
            total_costs,
            marketplace_fees: breakdown.marketplace_fees()?,
            net_profit,
            margin_percent: round_display(margin),
            break_even_price: break_even,
            channel_label: policy.label.clone(),
            fee_description: quote.description,
            breakdown,
        })
    }
}

// =============================================================================
// Break-even
// =============================================================================

/// Price at which net profit is zero, rounded to cents.
///
/// Solves `price = fixed_costs / (1 − commission − tax)` with both rates as
/// fractions. Returns `Ok(None)` when the rates take 100% or more of the
/// price, since no price breaks even then.
///
/// ## Errors
/// [`ValidationError::OutOfRange`] when the solved price does not fit in a
/// `Decimal`.
///
/// ## Example
/// ```rust
/// use lucro_core::calculator::break_even_price;
/// use lucro_core::{Money, Rate};
///
/// let price = break_even_price(Money::from_cents(6400), Rate::from_bps(2000), Rate::zero());
/// assert_eq!(price.unwrap(), Some(Money::from_cents(8000)));
///
/// let all_fees = (Rate::from_bps(6000), Rate::from_bps(4000));
/// let none = break_even_price(Money::from_cents(6400), all_fees.0, all_fees.1);
/// assert_eq!(none.unwrap(), None);
/// ```
pub fn break_even_price(
    fixed_costs: Money,
    commission: Rate,
    tax: Rate,
) -> Result<Option<Money>, ValidationError> {
    let remaining = Decimal::ONE
        .checked_sub(commission.fraction())
        .and_then(|rest| rest.checked_sub(tax.fraction()));
    let remaining = require_in_range("breakEvenPrice", remaining)?;
    if remaining <= Decimal::ZERO {
        return Ok(None);
    }

    let price = require_in_range("breakEvenPrice", fixed_costs.amount().checked_div(remaining))?;
    Ok(Some(Money::from_decimal(price).round_cents()))
}

// =============================================================================
// Unit Tests
// =============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::tax::TaxRegime;
    use proptest::prelude::*;

    fn no_threshold_channel() -> impl Strategy<Value = Channel> {
        prop_oneof![Just(Channel::Shopee), Just(Channel::DirectPix)]
    }

    fn threshold_channel() -> impl Strategy<Value = Channel> {
        prop_oneof![Just(Channel::MarketplaceClassic), Just(Channel::MarketplacePremium)]
    }

    fn sale(
        channel: Channel,
        price: i64,
        cost: i64,
        packaging: i64,
        shipping: i64,
    ) -> CalculationInputs {
        CalculationInputs::new(channel, Money::from_cents(price)).with_costs(
            Money::from_cents(cost),
            Money::from_cents(packaging),
            Money::from_cents(shipping),
        )
    }

    proptest! {
        /// Net profit is the sale price minus every breakdown component.
        #[test]
        fn net_profit_matches_breakdown(
            channel in prop::sample::select(Channel::ALL.to_vec()),
            price in -100_000i64..1_000_000,
            cost in 0i64..500_000,
            packaging in 0i64..10_000,
            shipping in 0i64..50_000,
            tax_bps in 0u32..=2000,
        ) {
            let inputs = sale(channel, price, cost, packaging, shipping)
                .with_tax_regime(TaxRegime::PercentOfSale(Rate::from_bps(tax_bps)));
            let result = ProfitCalculator::default().calculate_profit(&inputs).unwrap();

            let total = result.breakdown.total().unwrap();
            prop_assert_eq!(result.total_costs, total);
            prop_assert_eq!(result.net_profit, result.sale_price - total);
        }

        /// Margin is net profit over price, within display rounding.
        #[test]
        fn margin_matches_ratio(
            channel in prop::sample::select(Channel::ALL.to_vec()),
            price in 1i64..1_000_000,
            cost in 0i64..500_000,
        ) {
            let inputs = sale(channel, price, cost, 0, 0);
            let result = ProfitCalculator::default().calculate_profit(&inputs).unwrap();

            let ratio = result.net_profit.amount() / result.sale_price.amount();
            let exact = ratio * Decimal::ONE_HUNDRED;
            prop_assert!((result.margin_percent - exact).abs() <= Decimal::new(1, 2));
        }

        /// Re-running at the break-even price lands within one cent of zero.
        #[test]
        fn break_even_recomputes_to_zero(
            channel in no_threshold_channel(),
            price in 1i64..1_000_000,
            cost in 0i64..500_000,
            packaging in 0i64..10_000,
            shipping in 0i64..50_000,
            tax_bps in 0u32..=2000,
            gateway_bps in 0u32..=500,
        ) {
            let calc = ProfitCalculator::default();
            let inputs = sale(channel, price, cost, packaging, shipping)
                .with_tax_regime(TaxRegime::PercentOfSale(Rate::from_bps(tax_bps)))
                .with_gateway_fee(Rate::from_bps(gateway_bps));
            let result = calc.calculate_profit(&inputs).unwrap();
            let be = result.break_even_price.unwrap();

            let mut at_break_even = inputs.clone();
            at_break_even.sale_price = be;
            let recomputed = calc.calculate_profit(&at_break_even).unwrap();

            prop_assert!(recomputed.net_profit.abs() <= Money::from_cents(1));
        }

        /// On threshold channels the break-even price nets zero (within a
        /// cent) under the fixed fee decided at the original price.
        #[test]
        fn break_even_with_frozen_fixed_fee(
            channel in threshold_channel(),
            price in 1i64..30_000,
            cost in 0i64..20_000,
            packaging in 0i64..2_000,
            shipping in 0i64..5_000,
            tax_bps in 0u32..=2000,
        ) {
            let calc = ProfitCalculator::default();
            let tax_rate = Rate::from_bps(tax_bps);
            let inputs = sale(channel, price, cost, packaging, shipping)
                .with_tax_regime(TaxRegime::PercentOfSale(tax_rate));
            let result = calc.calculate_profit(&inputs).unwrap();
            let be = result.break_even_price.unwrap();

            let quote = calc.resolve_fees(channel, inputs.sale_price, None).unwrap();
            let commission = be.percent(quote.commission_percent).unwrap().round_cents();
            let tax = be.percent(tax_rate).unwrap().round_cents();
            let net = be - inputs.item_costs().unwrap() - quote.fixed_fee - commission - tax;

            prop_assert!(net.abs() <= Money::from_cents(1));
        }

        /// Threshold channels charge the fixed fee strictly below 79,00.
        #[test]
        fn fixed_fee_threshold(price in 0i64..20_000) {
            let calc = ProfitCalculator::default();
            for channel in [Channel::MarketplaceClassic, Channel::MarketplacePremium] {
                let result = calc.calculate_profit(&sale(channel, price, 0, 0, 0)).unwrap();
                if price < 7900 {
                    prop_assert_eq!(result.breakdown.fixed_fee, Money::from_cents(650));
                } else {
                    prop_assert!(result.breakdown.fixed_fee.is_zero());
                }
            }
        }

        /// Switching MEI to a percent-of-sale rate costs exactly that tax.
        #[test]
        fn regime_switch_changes_profit_by_tax(
            channel in prop::sample::select(Channel::ALL.to_vec()),
            price in 0i64..1_000_000,
            cost in 0i64..500_000,
            tax_bps in 0u32..=3000,
        ) {
            let calc = ProfitCalculator::default();
            let rate = Rate::from_bps(tax_bps);
            let exempt = sale(channel, price, cost, 0, 0);
            let taxed = exempt.clone().with_tax_regime(TaxRegime::PercentOfSale(rate));

            let exempt = calc.calculate_profit(&exempt).unwrap();
            let taxed = calc.calculate_profit(&taxed).unwrap();
            let tax = Money::from_cents(price).percent(rate).unwrap().round_cents();

            prop_assert_eq!(taxed.net_profit - exempt.net_profit, -tax);
        }
    }
}
