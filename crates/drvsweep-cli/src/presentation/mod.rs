//! Shared CLI presentation utilities.
//!
//! This module provides reusable display and formatting functions
//! for consistent CLI output across commands.
//!
//! # Guidelines
//!
//! - Keep this module format-only: the orchestrator's snapshot is never
//!   modified here, only borrowed and reordered for display
//! - Error phrasing is chosen here from stable error categories

pub mod driver_display;
pub mod progress;
pub mod tables;

// Re-export commonly used items
pub use driver_display::{SortColumn, print_driver_table, print_outcome, select_rows};
pub use progress::spinner;
pub use tables::{print_separator, truncate_string};
