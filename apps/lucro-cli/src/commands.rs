//! # Subcommands
//!
//! Argument definitions and the work behind `calculate`, `json` and
//! `channels`. Each returns the text to print so it can be tested without a
//! terminal.

use chrono::NaiveDate;
use clap::Args;
use std::io::Read;

use lucro_core::fees::{Commission, FeeTable};
use lucro_core::TaxMode;

use crate::error::ApiError;
use crate::handler::{AmountField, CalculationRequest, RequestHandler};

/// Arguments for the calculate subcommand.
#[derive(Args, Debug, Clone)]
pub struct CalculateArgs {
    /// Sale price in reais.
    #[arg(long, allow_hyphen_values = true)]
    pub price: f64,

    /// Cost of the product.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub cost: f64,

    /// Packaging cost per unit.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub packaging: f64,

    /// Shipping paid by the seller.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub shipping: f64,

    /// Channel key (shopee, marketplace-classic, marketplace-premium, direct-pix).
    #[arg(long)]
    pub channel: String,

    /// Percent-of-sale tax rate (Simples Nacional). Omit for MEI.
    #[arg(long, allow_hyphen_values = true)]
    pub tax_rate: Option<f64>,

    /// Gateway percentage for direct sales.
    #[arg(long, allow_hyphen_values = true)]
    pub gateway_fee: Option<f64>,

    /// Print the shareable text summary instead of JSON.
    #[arg(long)]
    pub summary: bool,
}

impl CalculateArgs {
    /// Flags as a request, the same shape a JSON body produces.
    pub fn to_request(&self) -> CalculationRequest {
        CalculationRequest {
            sale_price: AmountField::Number(self.price),
            cost_of_goods: AmountField::Number(self.cost),
            packaging_cost: AmountField::Number(self.packaging),
            shipping_cost: AmountField::Number(self.shipping),
            channel: self.channel.clone(),
            tax_regime: if self.tax_rate.is_some() {
                TaxMode::PercentOfSale
            } else {
                TaxMode::FlatExempt
            },
            tax_rate: self.tax_rate,
            gateway_fee_percent: self.gateway_fee,
            include_summary: self.summary,
        }
    }
}

/// Arguments for the json subcommand.
#[derive(Args, Debug, Clone)]
pub struct JsonArgs {
    /// Request file, or "-" for stdin.
    #[arg(default_value = "-")]
    pub input: String,
}

/// `lucro calculate`: summary text, or the response as pretty JSON.
pub fn run_calculate(
    handler: &RequestHandler,
    args: &CalculateArgs,
    today: NaiveDate,
) -> Result<String, ApiError> {
    let response = handler.handle(args.to_request(), today)?;

    match response.summary {
        Some(summary) => Ok(summary),
        None => to_pretty_json(&response),
    }
}

/// `lucro json`: one JSON request in, one JSON response out.
pub fn run_json(
    handler: &RequestHandler,
    body: &str,
    today: NaiveDate,
) -> Result<String, ApiError> {
    let response = handler.handle_json(body, today)?;
    to_pretty_json(&response)
}

/// Reads a request body from a file or stdin.
pub fn read_request_body(input: &str) -> Result<String, ApiError> {
    if input == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .map_err(|e| ApiError::malformed(format!("Cannot read stdin: {}", e)))?;
        Ok(body)
    } else {
        std::fs::read_to_string(input)
            .map_err(|e| ApiError::malformed(format!("Cannot read {}: {}", input, e)))
    }
}

/// `lucro channels`: the active fee table, one channel per line.
pub fn list_channels(table: &FeeTable) -> String {
    table
        .iter()
        .map(|(channel, policy)| {
            let fees = match policy.commission {
                Commission::Percent { rate } => {
                    let mut fees = format!("{} + {}", rate, policy.fixed_fee);
                    if let Some(threshold) = policy.fixed_fee_threshold {
                        fees.push_str(&format!(" (sem taxa fixa a partir de {})", threshold));
                    }
                    fees
                }
                Commission::Gateway { default_rate } => {
                    format!("{} intermediador (padrão)", default_rate)
                }
            };
            format!("{:<22} {:<24} {}", channel.key(), policy.label, fees)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::internal(e.to_string()))
}
