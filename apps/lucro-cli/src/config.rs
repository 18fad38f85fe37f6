//! Calculator configuration module.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then `LUCRO_*` environment variables.
//!
//! ```toml
//! default_gateway_fee = 0.8
//! log_filter = "lucro=debug"
//! strict_inputs = true
//!
//! [[channels]]
//! channel = "shopee"
//! commission_percent = 22
//! fixed_fee = 4.5
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use lucro_core::fees::{Commission, FeeTable, MarketplaceFeePolicy};
use lucro_core::{Channel, CoreError, Money, Rate, DEFAULT_GATEWAY_FEE_BPS};

/// Environment variable prefix (`LUCRO_LOG_FILTER`, `LUCRO_STRICT_INPUTS`, ...).
pub const ENV_PREFIX: &str = "LUCRO";

/// Calculator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Gateway percentage for direct sales when a request gives none
    pub default_gateway_fee: Rate,

    /// tracing filter used when `RUST_LOG` is not set
    pub log_filter: String,

    /// Reject negative prices and costs before calculating
    pub strict_inputs: bool,

    /// Fee table overrides, applied on top of the standard table
    pub channels: Vec<ChannelOverride>,
}

/// Replaces parts of one channel's standard policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelOverride {
    pub channel: Channel,
    #[serde(default)]
    pub label: Option<String>,
    /// Commission for platform channels, default rate for gateway channels
    #[serde(default)]
    pub commission_percent: Option<Rate>,
    #[serde(default)]
    pub fixed_fee: Option<Money>,
    #[serde(default)]
    pub fixed_fee_threshold: Option<Money>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            default_gateway_fee: Rate::from_bps(DEFAULT_GATEWAY_FEE_BPS),
            log_filter: "info".to_string(),
            strict_inputs: false,
            channels: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path` (if it exists) and the environment.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load configuration from TOML text, without the environment.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Builds the fee table: standard rules, default gateway fee, then overrides.
    pub fn fee_table(&self) -> Result<FeeTable, ConfigError> {
        let mut table = FeeTable::standard().with_default_gateway_fee(self.default_gateway_fee)?;

        for entry in &self.channels {
            let policy = entry.apply(table.policy(entry.channel)?);
            table = table.with_policy(entry.channel, policy)?;
        }

        Ok(table)
    }
}

impl ChannelOverride {
    fn apply(&self, base: &MarketplaceFeePolicy) -> MarketplaceFeePolicy {
        let mut policy = base.clone();

        if let Some(label) = &self.label {
            policy.label = label.clone();
        }

        if let Some(rate) = self.commission_percent {
            policy.commission = match policy.commission {
                Commission::Percent { .. } => Commission::Percent { rate },
                Commission::Gateway { .. } => Commission::Gateway { default_rate: rate },
            };
        }

        if let Some(fee) = self.fixed_fee {
            policy.fixed_fee = fee;
        }

        if let Some(threshold) = self.fixed_fee_threshold {
            policy.fixed_fee_threshold = Some(threshold);
        }

        policy
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid fee table override: {0}")]
    FeeTable(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.default_gateway_fee, Rate::from_bps(50));
        assert_eq!(config.log_filter, "info");
        assert!(!config.strict_inputs);
        assert!(config.channels.is_empty());
        assert_eq!(config.fee_table().unwrap(), FeeTable::standard());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load(Path::new("does-not-exist/lucro.toml")).unwrap();
        assert!(config.channels.is_empty());
    }

    #[test]
    fn test_scalar_settings() {
        let config = AppConfig::from_toml_str(
            r#"
            default_gateway_fee = 0.8
            log_filter = "lucro=debug"
            strict_inputs = true
            "#,
        )
        .unwrap();

        assert_eq!(config.default_gateway_fee, Rate::from_percent(dec!(0.8)));
        assert_eq!(config.log_filter, "lucro=debug");
        assert!(config.strict_inputs);

        let table = config.fee_table().unwrap();
        let quote = table
            .resolve_fees(Channel::DirectPix, Money::from_cents(10000), None)
            .unwrap();
        assert_eq!(quote.commission_percent, Rate::from_percent(dec!(0.8)));
    }

    #[test]
    fn test_channel_overrides() {
        let config = AppConfig::from_toml_str(
            r#"
            [[channels]]
            channel = "shopee"
            commission_percent = 22
            fixed_fee = "4.50"

            [[channels]]
            channel = "mercadolivre-premium"
            label = "ML Premium"
            fixed_fee_threshold = 99
            "#,
        )
        .unwrap();
        let table = config.fee_table().unwrap();

        let shopee = table
            .resolve_fees(Channel::Shopee, Money::from_cents(10000), None)
            .unwrap();
        assert_eq!(shopee.commission_percent, Rate::from_bps(2200));
        assert_eq!(shopee.fixed_fee, Money::from_cents(450));

        let premium = table.policy(Channel::MarketplacePremium).unwrap();
        assert_eq!(premium.label, "ML Premium");
        assert_eq!(premium.fixed_fee_threshold, Some(Money::from_cents(9900)));
        assert_eq!(premium.fixed_fee_for(Money::from_cents(8000)), Money::from_cents(650));
    }

    #[test]
    fn test_negative_override_rejected() {
        let config = AppConfig::from_toml_str(
            r#"
            [[channels]]
            channel = "shopee"
            fixed_fee = -1
            "#,
        )
        .unwrap();

        assert!(matches!(config.fee_table(), Err(ConfigError::FeeTable(_))));
    }

    #[test]
    fn test_unknown_channel_in_file_rejected() {
        let result = AppConfig::from_toml_str(
            r#"
            [[channels]]
            channel = "amazon"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
