//! Core services - the application's business logic layer.
//!
//! Services orchestrate between ports (trait interfaces) and domain logic.
//! They don't know about concrete implementations.

mod enumerator;
mod removal;
mod session;

pub use enumerator::{DriverEnumerator, ENUMERATE_ARGS};
pub use removal::{EMPTY_NAME_DIAGNOSTIC, NOT_ELEVATED_DIAGNOSTIC, RemovalExecutor};
pub use session::{BatchReport, SessionDeps, SessionOrchestrator};
