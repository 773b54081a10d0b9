//! Session-level state shared between the orchestrator and its callers.

use serde::{Deserialize, Serialize};

/// Whether the process holds administrative privileges.
///
/// Computed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationState {
    Elevated,
    NotElevated,
}

impl ElevationState {
    pub const fn from_bool(elevated: bool) -> Self {
        if elevated {
            Self::Elevated
        } else {
            Self::NotElevated
        }
    }

    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::Elevated)
    }
}

/// Orchestrator lifecycle.
///
/// `Uninitialized -> Loading -> Ready`, with `Loading` re-entered after
/// every removal batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Uninitialized,
    Loading,
    Ready,
}

/// What `start()` decided about the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Startup {
    /// Privileges are present; continue into the session.
    Elevated,
    /// An elevated copy was launched; this instance must exit now.
    Relaunched,
}
