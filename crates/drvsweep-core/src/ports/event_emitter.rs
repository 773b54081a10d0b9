//! Event emitter trait for worker-to-coordinator messages.
//!
//! The orchestrator never writes presentation state directly. It emits
//! [`SessionEvent`]s and the adapter decides how they travel (channel,
//! log, nothing).

use crate::events::SessionEvent;

/// Trait for emitting session events.
///
/// # Implementations
///
/// - `NoopEmitter` - For tests and one-shot contexts with no listener
/// - Adapter-specific implementations (e.g. a tokio channel)
pub trait SessionEventEmitter: Send + Sync {
    /// Emit a session event. Must not block.
    fn emit(&self, event: SessionEvent);
}

/// A no-op event emitter.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    pub const fn new() -> Self {
        Self
    }
}

impl SessionEventEmitter for NoopEmitter {
    fn emit(&self, _event: SessionEvent) {
        // Intentionally do nothing
    }
}
