//! Settings domain types and validation.
//!
//! These are pure domain types with no infrastructure dependencies.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default driver utility, resolved on the search path.
pub const DEFAULT_UTILITY: &str = "pnputil";

/// Upper bound accepted for the optional utility timeout.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Runtime settings for a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Program name or path of the driver utility.
    pub utility: String,

    /// Per-invocation timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            utility: DEFAULT_UTILITY.to_string(),
            timeout_secs: None,
        }
    }
}

impl Settings {
    /// Effective timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Driver utility path must not be empty")]
    EmptyUtility,

    #[error("Timeout must be between 1 and {MAX_TIMEOUT_SECS} seconds, got {0}")]
    InvalidTimeout(u64),
}

/// Validate settings before a session is built from them.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if settings.utility.trim().is_empty() {
        return Err(SettingsError::EmptyUtility);
    }

    if let Some(secs) = settings.timeout_secs
        && !(1..=MAX_TIMEOUT_SECS).contains(&secs)
    {
        return Err(SettingsError::InvalidTimeout(secs));
    }

    Ok(())
}
