//! Domain types for the driver inventory.
//!
//! These are pure data types with no infrastructure dependencies.

mod driver;
mod session;

pub use driver::{DriverOrigin, DriverRecord, Inventory, NOT_AVAILABLE, RemovalOutcome};
pub use session::{ElevationState, SessionState, Startup};
