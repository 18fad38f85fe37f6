//! # Shareable Summary
//!
//! Renders a calculation as the fixed multi-line text sellers paste into
//! WhatsApp. Presentation only: the numbers come straight from the
//! [`CalculationResult`] and are never recomputed here.
//!
//! ```text
//! 📊 *Calculadora de Lucro - Shopee*
//!
//! 💰 *Preço de Venda:* R$ 100,00
//! 🏷️ *Taxas do canal:* Shopee: 20% + R$ 4,00
//!
//! 📦 *Custos:*
//! - Produto: R$ 40,00
//! ...
//! _Calculado em 19/10/2026_
//! ```

use chrono::NaiveDate;

use crate::money::{format_percent, Money};
use crate::types::{CalculationInputs, CalculationResult};
use crate::MEI_MONTHLY_DAS_CENTS;

/// Builds the summary text for one calculation.
///
/// `calculated_on` is passed in so the output is deterministic.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use lucro_core::summary::generate_summary;
/// use lucro_core::{CalculationInputs, Channel, Money, ProfitCalculator};
///
/// let inputs = CalculationInputs::new(Channel::Shopee, Money::from_cents(10000));
/// let result = ProfitCalculator::default().calculate_profit(&inputs).unwrap();
/// let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
///
/// let text = generate_summary(&inputs, &result, date);
/// assert!(text.starts_with("📊 *Calculadora de Lucro - Shopee*"));
/// assert!(text.ends_with("_Calculado em 09/03/2026_"));
/// ```
pub fn generate_summary(
    inputs: &CalculationInputs,
    result: &CalculationResult,
    calculated_on: NaiveDate,
) -> String {
    let breakdown = &result.breakdown;
    let mei_note = if inputs.tax_regime.is_flat_exempt() {
        format!(" (MEI - DAS {}/mês)", Money::from_cents(MEI_MONTHLY_DAS_CENTS))
    } else {
        String::new()
    };
    let break_even = result
        .break_even_price
        .map(|price| price.to_string())
        .unwrap_or_else(|| "indefinido".to_string());

    format!(
        "📊 *Calculadora de Lucro - {label}*\n\
         \n\
         💰 *Preço de Venda:* {price}\n\
         🏷️ *Taxas do canal:* {fees}\n\
         \n\
         📦 *Custos:*\n\
         - Produto: {goods}\n\
         - Embalagem: {packaging}\n\
         - Frete: {shipping}\n\
         \n\
         💳 *Taxas Marketplace:*\n\
         - Comissão: {commission}\n\
         - Taxa fixa: {fixed_fee}\n\
         \n\
         🏛️ *Impostos:* {tax}{mei_note}\n\
         \n\
         ✅ *Lucro Líquido:* {net}\n\
         📈 *Margem:* {margin}\n\
         ⚖️ *Ponto de Equilíbrio:* {break_even}\n\
         \n\
         _Calculado em {date}_",
        label = result.channel_label,
        price = result.sale_price,
        fees = result.fee_description,
        goods = breakdown.cost_of_goods,
        packaging = breakdown.packaging_cost,
        shipping = breakdown.shipping_cost,
        commission = breakdown.commission,
        fixed_fee = breakdown.fixed_fee,
        tax = breakdown.tax,
        mei_note = mei_note,
        net = result.net_profit,
        margin = format_percent(result.margin_percent),
        break_even = break_even,
        date = calculated_on.format("%d/%m/%Y"),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
