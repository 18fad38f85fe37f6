//! # lucro-cli
//!
//! Configuration, request handling and command implementations for the
//! `lucro` binary. All arithmetic lives in `lucro-core`.

pub mod commands;
pub mod config;
pub mod error;
pub mod handler;

pub use crate::config::{AppConfig, ConfigError};
pub use crate::error::{ApiError, ErrorCode};
pub use crate::handler::{CalculationRequest, CalculationResponse, RequestHandler};
