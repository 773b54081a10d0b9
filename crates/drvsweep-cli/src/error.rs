//! CLI-specific error types and mappings.
//!
//! This module maps core error categories to exit codes and user-facing
//! messages.

use drvsweep_core::{ErrorCategory, InventoryError, SessionError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Administrative privileges are missing and could not be acquired.
    #[error("{0}")]
    Elevation(String),

    /// The driver utility could not be run or reported failure.
    #[error("Could not list driver packages: {0}")]
    Enumeration(String),

    /// The driver utility's listing could not be understood.
    #[error("Could not read the driver listing: {0}")]
    Parse(String),

    /// A removal was requested with nothing selected.
    #[error("No driver packages selected")]
    NoSelection,

    /// At least one package in a batch could not be removed.
    #[error("{failed} of {attempted} driver package(s) could not be removed")]
    RemovalFailed { failed: usize, attempted: usize },

    /// Invalid settings from flags or environment.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error (including partial removal failure)
    /// - 64-78: Specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::RemovalFailed { .. } => 1,
            Self::NoSelection => 64,      // EX_USAGE
            Self::Parse(_) => 65,         // EX_DATAERR
            Self::Enumeration(_) => 69,   // EX_UNAVAILABLE
            Self::Io(_) => 74,            // EX_IOERR
            Self::Elevation(_) => 77,     // EX_NOPERM
            Self::Config(_) => 78,        // EX_CONFIG
        }
    }

    /// Exit code for an error surfaced through `anyhow`.
    ///
    /// Unrecognised errors map to 1.
    pub fn exit_code_for(err: &anyhow::Error) -> u8 {
        if let Some(cli) = err.downcast_ref::<Self>() {
            return cli.exit_code();
        }
        if let Some(session) = err.downcast_ref::<SessionError>() {
            return Self::from(session.clone()).exit_code();
        }
        if let Some(inventory) = err.downcast_ref::<InventoryError>() {
            return Self::from(inventory.clone()).exit_code();
        }
        1
    }

    fn from_category(category: ErrorCategory, diagnostic: String) -> Self {
        match category {
            ErrorCategory::Elevation => Self::Elevation(diagnostic),
            ErrorCategory::Enumeration => Self::Enumeration(diagnostic),
            ErrorCategory::Parse => Self::Parse(diagnostic),
            ErrorCategory::NoSelection => Self::NoSelection,
        }
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Elevation(elevation) => Self::Elevation(elevation.to_string()),
            other => Self::from_category(other.category(), other.diagnostic()),
        }
    }
}

impl From<InventoryError> for CliError {
    fn from(err: InventoryError) -> Self {
        Self::from_category(err.category(), err.diagnostic())
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
