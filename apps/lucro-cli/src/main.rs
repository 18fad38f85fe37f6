//! # lucro
//!
//! Command-line profit calculator for marketplace sellers.
//!
//! ## Usage
//! ```text
//! lucro calculate --price 100 --cost 40 --packaging 5 --shipping 15 --channel shopee
//! lucro calculate --price 100 --cost 40 --channel marketplace-classic --tax-rate 6 --summary
//! echo '{"salePrice": 100, "channel": "pix"}' | lucro json
//! lucro channels
//! ```
//!
//! Results go to stdout; logs and errors go to stderr. A failed calculation
//! prints `{ "code", "message" }` and exits with status 1.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lucro_cli::commands::{self, CalculateArgs, JsonArgs};
use lucro_cli::{AppConfig, RequestHandler};

/// Marketplace profit and break-even calculator.
#[derive(Parser, Debug)]
#[command(name = "lucro", version, about)]
struct Cli {
    /// Configuration file (TOML). Skipped when missing.
    #[arg(long, global = true, default_value = "lucro.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculate one sale from flags.
    Calculate(CalculateArgs),
    /// Calculate one sale from a JSON request.
    Json(JsonArgs),
    /// Show the active fee table.
    Channels,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    init_tracing(&config.log_filter);
    info!(
        path = %cli.config.display(),
        strict_inputs = config.strict_inputs,
        overrides = config.channels.len(),
        "Configuration loaded"
    );

    let handler = RequestHandler::from_config(&config).context("building fee table")?;
    let today = chrono::Local::now().date_naive();

    let outcome = match &cli.command {
        Commands::Calculate(args) => commands::run_calculate(&handler, args, today),
        Commands::Json(args) => commands::read_request_body(&args.input)
            .and_then(|body| commands::run_json(&handler, &body, today)),
        Commands::Channels => Ok(commands::list_channels(handler.calculator().fee_table())),
    };

    match outcome {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(err) => {
            error!(code = ?err.code, "{}", err.message);
            eprintln!("{}", serde_json::to_string_pretty(&err)?);
            std::process::exit(1);
        }
    }
}

/// Logs to stderr. `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
