//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;
use drvsweep_core::Settings;

use crate::commands::Commands;

/// Inventory and remove unused OEM driver packages.
///
/// Without a subcommand, an interactive session lists the packages and
/// prompts for the ones to remove.
#[derive(Parser)]
#[command(name = "drvsweep")]
#[command(about = "List and remove unused third-party driver packages")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Driver utility to run (name on the search path or full path)
    #[arg(long = "pnputil", env = "DRVSWEEP_PNPUTIL", global = true)]
    pub pnputil: Option<String>,

    /// Kill a utility call that runs longer than this many seconds
    #[arg(long = "timeout", env = "DRVSWEEP_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Settings requested on the command line, unvalidated.
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(utility) = &self.pnputil {
            settings.utility.clone_from(utility);
        }
        settings.timeout_secs = self.timeout;
        settings
    }
}
