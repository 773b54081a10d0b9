//! Core of drvsweep: driver inventory model, listing parser and the
//! session orchestrator that ties enumeration and removal together.
//!
//! This crate performs no I/O of its own. Process execution, privilege
//! checks and event transport are reached through the traits in [`ports`].
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod inventory;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    DriverOrigin, DriverRecord, ElevationState, Inventory, NOT_AVAILABLE, RemovalOutcome,
    SessionState, Startup,
};
pub use events::SessionEvent;
pub use inventory::parse_driver_listing;
pub use ports::{
    CommandError, CommandRunner, ElevationError, ElevationPort, EnumerationError, ErrorCategory,
    InventoryError, NoopEmitter, ParseError, SessionError, SessionEventEmitter, ToolInvocation,
    ToolOutput,
};
pub use services::{BatchReport, SessionDeps, SessionOrchestrator};
pub use settings::{Settings, SettingsError, validate_settings};

// Silence unused dev-dependency warnings for crates only used by some tests
#[cfg(test)]
use tokio_test as _;
