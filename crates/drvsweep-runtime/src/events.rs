//! Channel-backed event emitter.
//!
//! Session work runs on runtime worker tasks; the coordinating task (the
//! CLI's render loop) owns the receiving half and is the only place that
//! prints.

use drvsweep_core::events::SessionEvent;
use drvsweep_core::ports::SessionEventEmitter;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

/// Forwards every [`SessionEvent`] into an unbounded channel.
///
/// Emitting never blocks. Events sent after the receiver is dropped are
/// discarded.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    sender: UnboundedSender<SessionEvent>,
}

impl ChannelEmitter {
    pub const fn new(sender: UnboundedSender<SessionEvent>) -> Self {
        Self { sender }
    }

    /// Create an emitter together with the receiver it feeds.
    pub fn channel() -> (Self, UnboundedReceiver<SessionEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl SessionEventEmitter for ChannelEmitter {
    fn emit(&self, event: SessionEvent) {
        if self.sender.send(event).is_err() {
            trace!("Session event dropped: receiver closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drvsweep_core::domain::{RemovalOutcome, SessionState};

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (emitter, mut receiver) = ChannelEmitter::channel();
        emitter.emit(SessionEvent::state_changed(SessionState::Loading));
        emitter.emit(SessionEvent::removal_completed(RemovalOutcome::success("oem1.inf")));

        assert_eq!(
            receiver.recv().await,
            Some(SessionEvent::state_changed(SessionState::Loading))
        );
        assert_eq!(
            receiver.recv().await,
            Some(SessionEvent::removal_completed(RemovalOutcome::success("oem1.inf")))
        );
    }

    #[test]
    fn test_closed_receiver_is_ignored() {
        let (emitter, receiver) = ChannelEmitter::channel();
        drop(receiver);
        emitter.emit(SessionEvent::state_changed(SessionState::Ready));
    }
}
