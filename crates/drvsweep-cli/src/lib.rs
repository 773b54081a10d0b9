//! Terminal front end for drvsweep.
//!
//! Lists OEM driver packages with their bound-device counts and removes
//! the ones the operator selects.
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for crates only used by some tests
#[cfg(test)]
use tokio_test as _;
#[cfg(test)]
use async_trait as _;

// Used only by the binary target
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod utils;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
