//! # lucro-core: Pure Profit Calculation for Marketplace Sellers
//!
//! Answers one question for a small Brazilian seller: after the channel's
//! commission, its fixed fee, taxes and my own costs, how much do I keep on
//! this sale, and what is the lowest price that does not lose money?
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Calculadora de Lucro                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 lucro-cli (apps/lucro-cli)                      │   │
//! │  │   clap flags / JSON request ──► RequestHandler ──► JSON / text │   │
//! │  │   config (lucro.toml, LUCRO_*) ──► FeeTable overrides          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lucro-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   fees    │  │    tax    │  │calculator │  │  summary  │  │   │
//! │  │   │ FeeTable  │  │ TaxRegime │  │  Profit-  │  │ WhatsApp  │  │   │
//! │  │   │  policies │  │compute_tax│  │ Calculator│  │   text    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • PURE FUNCTIONS                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Channel, Rate, inputs and results
//! - [`money`] - Decimal Money type and pt-BR formatting
//! - [`fees`] - Per-channel fee policies and the fee table
//! - [`tax`] - MEI and percent-of-sale tax regimes
//! - [`calculator`] - Profit, margin and break-even
//! - [`summary`] - Shareable text report
//! - [`validation`] - Boundary checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same inputs, same result, on any thread
//! 2. **Decimal Money**: full precision internally, cents on presentation
//! 3. **Fee Table as Data**: channels are looked up, never string-matched
//! 4. **Losses Are Results**: only structurally invalid input is an error
//!
//! ## Example Usage
//!
//! ```rust
//! use lucro_core::{CalculationInputs, Channel, Money, ProfitCalculator, Rate, TaxRegime};
//!
//! let calculator = ProfitCalculator::default();
//!
//! let inputs = CalculationInputs::new(Channel::Shopee, Money::from_cents(10000))
//!     .with_costs(Money::from_cents(4000), Money::from_cents(500), Money::from_cents(1500))
//!     .with_tax_regime(TaxRegime::PercentOfSale(Rate::from_bps(600)));
//!
//! let result = calculator.calculate_profit(&inputs).unwrap();
//! assert_eq!(result.net_profit.to_string(), "R$ 10,00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod error;
pub mod fees;
pub mod money;
pub mod summary;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::{break_even_price, ProfitCalculator};
pub use error::{CoreError, CoreResult, ValidationError};
pub use fees::{Commission, FeeQuote, FeeTable, MarketplaceFeePolicy};
pub use money::Money;
pub use summary::generate_summary;
pub use tax::{compute_tax, TaxMode, TaxRegime};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Gateway percentage used for direct sales when the caller gives none (0,5%).
pub const DEFAULT_GATEWAY_FEE_BPS: u32 = 50;

/// Sale price at which Mercado Livre waives its fixed fee (R$ 79,00).
pub const FIXED_FEE_WAIVER_THRESHOLD_CENTS: i64 = 7900;

/// MEI monthly DAS payment shown in summaries (R$ 81,05).
///
/// Informational only; it is not amortised into per-sale tax.
pub const MEI_MONTHLY_DAS_CENTS: i64 = 8105;
