//! OS adapters for drvsweep.
//!
//! Implements the ports declared in `drvsweep-core`: running the driver
//! utility as a child process, checking and acquiring administrative
//! privileges, and carrying session events over a channel.

mod command;
pub mod elevation;
mod events;

pub use command::TokioCommandRunner;
pub use elevation::{SystemElevation, quote_argument};
pub use events::ChannelEmitter;
