//! Session events posted from the worker side back to the coordinator.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "removal_completed", "outcome": { "packageName": "oem12.inf", "succeeded": true, "diagnosticText": "" } }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{RemovalOutcome, SessionState};
use crate::ports::ErrorCategory;

/// Everything the orchestrator reports while it works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The orchestrator moved to a new lifecycle state.
    StateChanged { state: SessionState },

    /// A load finished and the snapshot was replaced.
    InventoryLoaded {
        /// Number of OEM records in the new snapshot.
        count: usize,
        /// How many of those have no bound device.
        unused: usize,
    },

    /// A load failed; the previous snapshot is still current.
    InventoryFailed {
        category: ErrorCategory,
        diagnostic: String,
    },

    /// A single removal call is about to be issued.
    RemovalStarted {
        #[serde(rename = "packageName")]
        package_name: String,
    },

    /// A single removal call finished (either way).
    RemovalCompleted { outcome: RemovalOutcome },

    /// Every removal in the batch has been attempted.
    BatchFinished { attempted: usize, succeeded: usize },
}

impl SessionEvent {
    pub const fn state_changed(state: SessionState) -> Self {
        Self::StateChanged { state }
    }

    pub fn removal_started(package_name: impl Into<String>) -> Self {
        Self::RemovalStarted {
            package_name: package_name.into(),
        }
    }

    pub const fn removal_completed(outcome: RemovalOutcome) -> Self {
        Self::RemovalCompleted { outcome }
    }
}
