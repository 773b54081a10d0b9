//! Driver package records and removal outcomes.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Placeholder shown for optional fields that pnputil left empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// Where a driver package came from.
///
/// Only [`DriverOrigin::Oem`] packages ever leave the parser; the other
/// variants exist so classification is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverOrigin {
    /// Installed by a hardware vendor (published as `oemNN.inf`).
    Oem,
    /// Shipped with the base operating system image.
    System,
    /// Anything that matches neither convention.
    Other,
}

impl DriverOrigin {
    /// Classify a published package name.
    ///
    /// A package is OEM-origin iff its name, compared case-insensitively,
    /// starts with `oem` and ends with `.inf`.
    pub fn classify(package_name: &str) -> Self {
        let lower = package_name.trim().to_ascii_lowercase();
        if lower.starts_with("oem") && lower.ends_with(".inf") {
            Self::Oem
        } else if lower.ends_with(".inf") {
            Self::System
        } else {
            Self::Other
        }
    }
}

/// One driver package from an enumeration.
///
/// Records are immutable once built. A fresh batch replaces the previous
/// one after every load, so usage counts are never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRecord {
    /// Published name in the driver store (e.g. `oem12.inf`). Removal key.
    pub package_name: String,
    /// Vendor-supplied INF file name.
    pub original_name: String,
    /// Provider (vendor) name.
    pub provider_name: String,
    /// Device setup class name.
    pub class_name: String,
    /// Number of present devices bound to this package.
    pub usage_count: u32,
    /// Origin classification.
    pub origin: DriverOrigin,
}

impl DriverRecord {
    /// Whether no device is currently bound to this package.
    pub const fn is_unused(&self) -> bool {
        self.usage_count == 0
    }
}

/// Immutable snapshot of the current inventory.
///
/// Readers clone the `Arc`; a reload swaps the whole snapshot.
pub type Inventory = Arc<[DriverRecord]>;

/// Result of one removal attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalOutcome {
    /// Package the removal was attempted for.
    pub package_name: String,
    /// Whether the utility reported success.
    pub succeeded: bool,
    /// Raw diagnostic text; empty on success.
    pub diagnostic_text: String,
}

impl RemovalOutcome {
    /// Successful removal.
    pub fn success(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            succeeded: true,
            diagnostic_text: String::new(),
        }
    }

    /// Failed removal with the diagnostic to show the operator.
    pub fn failure(package_name: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            succeeded: false,
            diagnostic_text: diagnostic.into(),
        }
    }
}
