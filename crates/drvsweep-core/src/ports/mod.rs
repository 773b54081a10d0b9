//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No process spawning or OS API types in any signature
//! - The command runner reports raw exit status and streams; meaning is
//!   assigned by core services
//! - Errors carry stable categories plus raw diagnostic text, never
//!   localized phrasing

pub mod command_runner;
pub mod elevation;
pub mod event_emitter;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use command_runner::{CommandRunner, ToolInvocation, ToolOutput};
pub use elevation::ElevationPort;
pub use event_emitter::{NoopEmitter, SessionEventEmitter};

/// Stable, machine-readable error category.
///
/// Presentation layers map these to their own (possibly localized) text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Elevation,
    Enumeration,
    Parse,
    NoSelection,
}

/// Failure to run an external command at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The process could not be spawned (missing binary, access denied).
    #[error("Failed to launch {program}: {reason}")]
    Launch { program: String, reason: String },

    /// The process did not finish within the configured timeout.
    #[error("{program} did not finish within {seconds}s")]
    TimedOut { program: String, seconds: u64 },
}

/// Administrative privileges could not be obtained or verified.
///
/// Fatal to startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElevationError {
    /// The elevation request was refused or failed.
    #[error("Administrator privileges are required: {0}")]
    Refused(String),

    /// The platform has no self-elevation primitive.
    #[error("Administrator privileges are required and cannot be requested here: {0}")]
    Unsupported(String),
}

impl ElevationError {
    pub fn diagnostic(&self) -> &str {
        match self {
            Self::Refused(msg) | Self::Unsupported(msg) => msg,
        }
    }
}

/// The driver listing utility failed to launch or exited non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnumerationError {
    #[error("Failed to run driver enumeration: {0}")]
    Launch(#[from] CommandError),

    #[error("Driver enumeration failed: {diagnostic}")]
    Failed {
        exit_code: Option<i32>,
        diagnostic: String,
    },
}

impl EnumerationError {
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Launch(err) => err.to_string(),
            Self::Failed { diagnostic, .. } => diagnostic.clone(),
        }
    }
}

/// The structured listing did not conform to the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to parse driver listing: {message}")]
pub struct ParseError {
    /// Underlying parser message.
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Either half of an inventory load failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl InventoryError {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Enumeration(_) => ErrorCategory::Enumeration,
            Self::Parse(_) => ErrorCategory::Parse,
        }
    }

    pub fn diagnostic(&self) -> String {
        match self {
            Self::Enumeration(err) => err.diagnostic(),
            Self::Parse(err) => err.message.clone(),
        }
    }
}

/// Errors returned by the session orchestrator.
///
/// Only [`SessionError::Elevation`] is fatal; everything else is a value
/// the caller may react to and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Elevation(#[from] ElevationError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Removal requested with an empty selection.
    #[error("No driver packages selected for removal")]
    NoSelection,
}

impl From<EnumerationError> for SessionError {
    fn from(err: EnumerationError) -> Self {
        Self::Inventory(err.into())
    }
}

impl From<ParseError> for SessionError {
    fn from(err: ParseError) -> Self {
        Self::Inventory(err.into())
    }
}

impl SessionError {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Elevation(_) => ErrorCategory::Elevation,
            Self::Inventory(err) => err.category(),
            Self::NoSelection => ErrorCategory::NoSelection,
        }
    }

    /// Raw diagnostic text suitable for verbatim display.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Elevation(err) => err.diagnostic().to_string(),
            Self::Inventory(err) => err.diagnostic(),
            Self::NoSelection => String::new(),
        }
    }

    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Elevation(_))
    }
}
