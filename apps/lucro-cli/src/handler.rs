//! # Request Handler
//!
//! Turns a raw calculation request (JSON body or CLI flags) into a
//! [`CalculationResponse`].
//!
//! ```text
//! CalculationRequest ──► into_inputs ──► strict check? ──► calculate_profit
//!   (f64 / "R$ 1.234,56")   (Money, Rate,                        │
//!                            Channel, TaxRegime)                 ▼
//!                                          CalculationResponse { requestId, result, summary? }
//! ```
//!
//! Nothing here is stored. Each request is independent and the handler can
//! be shared across threads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use lucro_core::validation::{validate_required, validate_strict_inputs};
use lucro_core::{
    generate_summary, CalculationInputs, CalculationResult, Channel, CoreResult, Money,
    ProfitCalculator, Rate, TaxMode, TaxRegime, ValidationError,
};

use crate::config::{AppConfig, ConfigError};
use crate::error::ApiError;

// =============================================================================
// Request / Response
// =============================================================================

/// A monetary field as sent by a form: a JSON number or a pt-BR string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    Number(f64),
    /// `"R$ 1.234,56"`; dots are thousands separators.
    Text(String),
}

impl Default for AmountField {
    fn default() -> Self {
        AmountField::Number(0.0)
    }
}

impl AmountField {
    fn to_money(&self, field: &str) -> Result<Money, ValidationError> {
        match self {
            AmountField::Number(value) => Money::try_from_f64(field, *value),
            AmountField::Text(text) => {
                Money::parse_brl(text).map_err(|e| ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: match e {
                        ValidationError::InvalidFormat { reason, .. } => reason,
                        other => other.to_string(),
                    },
                })
            }
        }
    }
}

/// Raw calculation request.
///
/// ```json
/// {
///   "salePrice": 100,
///   "costOfGoods": "40,00",
///   "packagingCost": 5,
///   "shippingCost": 15,
///   "channel": "shopee",
///   "taxRegime": "percent_of_sale",
///   "taxRate": 6,
///   "includeSummary": true
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    pub sale_price: AmountField,
    #[serde(default)]
    pub cost_of_goods: AmountField,
    #[serde(default)]
    pub packaging_cost: AmountField,
    #[serde(default)]
    pub shipping_cost: AmountField,
    pub channel: String,
    #[serde(default)]
    pub tax_regime: TaxMode,
    #[serde(default)]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub gateway_fee_percent: Option<f64>,
    #[serde(default)]
    pub include_summary: bool,
}

impl CalculationRequest {
    /// Converts raw fields into typed calculator inputs.
    ///
    /// ## Errors
    /// - blank or unknown channel
    /// - percent-of-sale regime without a finite, non-negative rate
    /// - NaN / infinite / unparseable amounts
    pub fn into_inputs(self) -> CoreResult<CalculationInputs> {
        let channel: Channel = validate_required("channel", &self.channel)?.parse()?;
        let tax_regime = TaxRegime::from_selection(self.tax_regime, self.tax_rate)?;

        let gateway_fee_percent = self
            .gateway_fee_percent
            .map(|raw| Rate::try_from_f64("gatewayFeePercent", raw))
            .transpose()?;

        Ok(CalculationInputs {
            sale_price: self.sale_price.to_money("salePrice")?,
            cost_of_goods: self.cost_of_goods.to_money("costOfGoods")?,
            packaging_cost: self.packaging_cost.to_money("packagingCost")?,
            shipping_cost: self.shipping_cost.to_money("shippingCost")?,
            channel,
            tax_regime,
            gateway_fee_percent,
        })
    }
}

/// Successful calculation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    /// Correlates this response with its log lines.
    pub request_id: Uuid,
    pub result: CalculationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

// =============================================================================
// Handler
// =============================================================================

/// Validates requests and runs them through the calculator.
#[derive(Debug, Clone, Default)]
pub struct RequestHandler {
    calculator: ProfitCalculator,
    strict_inputs: bool,
}

impl RequestHandler {
    pub fn new(calculator: ProfitCalculator, strict_inputs: bool) -> Self {
        RequestHandler {
            calculator,
            strict_inputs,
        }
    }

    /// Builds the fee table from `config` and wraps it in a handler.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let calculator = ProfitCalculator::new(config.fee_table()?);
        Ok(RequestHandler::new(calculator, config.strict_inputs))
    }

    pub fn calculator(&self) -> &ProfitCalculator {
        &self.calculator
    }

    /// Runs one calculation. `today` stamps the optional summary.
    pub fn handle(
        &self,
        request: CalculationRequest,
        today: NaiveDate,
    ) -> Result<CalculationResponse, ApiError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("calculate", %request_id);
        let _enter = span.enter();

        let include_summary = request.include_summary;
        let inputs = request.into_inputs().map_err(|e| {
            warn!(error = %e, "Rejected calculation request");
            ApiError::from(e)
        })?;

        if self.strict_inputs {
            validate_strict_inputs(&inputs).map_err(|e| {
                warn!(error = %e, "Rejected by strict input validation");
                ApiError::from(e)
            })?;
        }

        debug!(
            channel = %inputs.channel,
            sale_price = %inputs.sale_price.amount(),
            "Calculating"
        );

        let result = self.calculator.calculate_profit(&inputs).map_err(|e| {
            warn!(error = %e, "Calculation failed");
            ApiError::from(e)
        })?;
        let summary = include_summary.then(|| generate_summary(&inputs, &result, today));

        info!(
            channel = %inputs.channel,
            net_profit = %result.net_profit.amount(),
            margin = %result.margin_percent,
            "Calculation complete"
        );

        Ok(CalculationResponse {
            request_id,
            result,
            summary,
        })
    }

    /// Parses a JSON request body, then [`handle`](Self::handle)s it.
    pub fn handle_json(
        &self,
        body: &str,
        today: NaiveDate,
    ) -> Result<CalculationResponse, ApiError> {
        let request: CalculationRequest = serde_json::from_str(body)?;
        self.handle(request, today)
    }
}
