//! Driver table rendering, ordering and per-item outcome lines.

use std::cmp::Ordering;

use clap::ValueEnum;
use drvsweep_core::{DriverRecord, RemovalOutcome};

use super::tables::{print_separator, truncate_string};

/// Columns the driver table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
    /// Published name (oemN.inf), in numeric order
    Package,
    /// Original INF name
    Original,
    /// Provider
    Provider,
    /// Device class
    Class,
    /// Number of bound devices
    Devices,
}

/// Borrow, filter and order records for display.
///
/// Ties on the chosen column fall back to package order, so output is
/// stable across runs.
pub fn select_rows(
    records: &[DriverRecord],
    unused_only: bool,
    sort: SortColumn,
    reverse: bool,
) -> Vec<&DriverRecord> {
    let mut rows: Vec<&DriverRecord> = records
        .iter()
        .filter(|r| !unused_only || r.is_unused())
        .collect();

    rows.sort_by(|a, b| {
        let primary = match sort {
            SortColumn::Package => Ordering::Equal,
            SortColumn::Original => text_order(&a.original_name, &b.original_name),
            SortColumn::Provider => text_order(&a.provider_name, &b.provider_name),
            SortColumn::Class => text_order(&a.class_name, &b.class_name),
            SortColumn::Devices => a.usage_count.cmp(&b.usage_count),
        };
        primary.then_with(|| package_order(&a.package_name, &b.package_name))
    });

    if reverse {
        rows.reverse();
    }
    rows
}

fn text_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// `oem9.inf` sorts before `oem10.inf`.
fn package_order(a: &str, b: &str) -> Ordering {
    let key = |name: &str| (oem_number(name).unwrap_or(u64::MAX), name.to_lowercase());
    key(a).cmp(&key(b))
}

fn oem_number(name: &str) -> Option<u64> {
    let lower = name.to_ascii_lowercase();
    lower.strip_prefix("oem")?.strip_suffix(".inf")?.parse().ok()
}

/// Print the driver table.
pub fn print_driver_table(rows: &[&DriverRecord]) {
    println!(
        "{:<12} {:<28} {:<26} {:<18} {:>7}",
        "Package", "Original Name", "Provider", "Class", "Devices"
    );
    print_separator(95);

    for record in rows {
        println!(
            "{:<12} {:<28} {:<26} {:<18} {:>7}",
            truncate_string(&record.package_name, 12),
            truncate_string(&record.original_name, 28),
            truncate_string(&record.provider_name, 26),
            truncate_string(&record.class_name, 18),
            record.usage_count
        );
    }
}

/// One line per removal attempt.
pub fn format_outcome(outcome: &RemovalOutcome) -> String {
    if outcome.succeeded {
        format!("✅ Removed {}", outcome.package_name)
    } else if outcome.diagnostic_text.is_empty() {
        format!("❌ Failed to remove {}", outcome.package_name)
    } else {
        format!(
            "❌ Failed to remove {}: {}",
            outcome.package_name, outcome.diagnostic_text
        )
    }
}

pub fn print_outcome(outcome: &RemovalOutcome) {
    println!("{}", format_outcome(outcome));
}
