//! Elevation port for privilege checks and self-relaunch.
//!
//! Core owns the trait; the runtime crate owns the platform calls.

use super::ElevationError;

/// Checks and requests administrative privileges for the current process.
#[cfg_attr(test, mockall::automock)]
pub trait ElevationPort: Send + Sync {
    /// Whether the current process is elevated.
    ///
    /// Cheap and idempotent; called once at startup and again right
    /// before every removal.
    fn is_elevated(&self) -> bool;

    /// Launch an elevated copy of the current executable with the same
    /// arguments.
    ///
    /// `Ok(())` means the copy was started and this instance should exit.
    fn relaunch_elevated(&self) -> Result<(), ElevationError>;
}
