//! Main commands enum.
//!
//! This module defines the available commands for the CLI tool.

use clap::Subcommand;

use crate::presentation::SortColumn;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List OEM driver packages and their bound-device counts
    List {
        /// Only show packages with no bound device
        #[arg(long)]
        unused: bool,
        /// Column to sort by
        #[arg(long, value_enum, default_value_t = SortColumn::Package)]
        sort: SortColumn,
        /// Sort in descending order
        #[arg(long)]
        reverse: bool,
        /// Print the records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Remove driver packages (uninstalling them from any device)
    Remove {
        /// Published package names, e.g. oem12.inf
        #[arg(required_unless_present = "all_unused")]
        packages: Vec<String>,
        /// Select every package with no bound device
        #[arg(long)]
        all_unused: bool,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show elevation state and the resolved settings
    Status,
}

impl Commands {
    /// Whether the command must pass the elevation check before running.
    ///
    /// `status` reports elevation, so it runs without it.
    pub const fn requires_elevation(&self) -> bool {
        !matches!(self, Self::Status)
    }
}
