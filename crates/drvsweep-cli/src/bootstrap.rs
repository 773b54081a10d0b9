//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Process runner and elevation port (via drvsweep-runtime)
//! - Event channel carrying session progress back to the terminal
//! - The session orchestrator (via drvsweep-core)
//!
//! Command handlers receive the composed context and delegate to the
//! orchestrator.

use std::sync::Arc;

use drvsweep_core::ports::{CommandRunner, ElevationPort};
use drvsweep_core::{SessionDeps, SessionEvent, SessionOrchestrator, Settings, validate_settings};
use drvsweep_runtime::{ChannelEmitter, SystemElevation, TokioCommandRunner};
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Driver utility and timeout.
    pub settings: Settings,
}

impl CliConfig {
    /// Create config from resolved settings, rejecting invalid values.
    pub fn from_settings(settings: Settings) -> Result<Self, CliError> {
        validate_settings(&settings)?;
        Ok(Self { settings })
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// The session that owns the driver inventory.
    pub session: Arc<SessionOrchestrator>,
    /// Privilege checks, also used directly by `status`.
    pub elevation: Arc<dyn ElevationPort>,
    /// Progress events posted by session work.
    pub events: Mutex<UnboundedReceiver<SessionEvent>>,
    /// Settings the session was built with.
    pub settings: Settings,
}

impl CliContext {
    /// Access the session orchestrator.
    pub const fn session(&self) -> &Arc<SessionOrchestrator> {
        &self.session
    }

    /// Access the elevation port.
    pub const fn elevation(&self) -> &Arc<dyn ElevationPort> {
        &self.elevation
    }

    /// Access the event receiver.
    pub const fn events(&self) -> &Mutex<UnboundedReceiver<SessionEvent>> {
        &self.events
    }

    /// Access the settings.
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Bootstrap the CLI application.
///
/// Builds the OS adapters and the session around them. Nothing is run
/// yet: elevation is checked by `SessionOrchestrator::start`.
pub fn bootstrap(config: CliConfig) -> CliContext {
    let runner: Arc<dyn CommandRunner> = Arc::new(TokioCommandRunner::new(config.settings.timeout()));
    let elevation: Arc<dyn ElevationPort> = Arc::new(SystemElevation::new());
    compose(runner, elevation, config.settings)
}

/// Assemble a context from explicit adapters.
pub fn compose(
    runner: Arc<dyn CommandRunner>,
    elevation: Arc<dyn ElevationPort>,
    settings: Settings,
) -> CliContext {
    let (emitter, receiver) = ChannelEmitter::channel();
    debug!(utility = %settings.utility, timeout = ?settings.timeout_secs, "Composing session");

    let session = Arc::new(SessionOrchestrator::new(SessionDeps {
        runner,
        elevation: Arc::clone(&elevation),
        events: Arc::new(emitter),
        settings: settings.clone(),
    }));

    CliContext {
        session,
        elevation,
        events: Mutex::new(receiver),
        settings,
    }
}
