//! Session orchestrator - owns the inventory and drives the lifecycle.
//!
//! All inventory mutation goes through [`SessionOrchestrator::load_inventory`]
//! and [`SessionOrchestrator::remove_selected`]. Both are serialized by one
//! async lock, so a removal batch and a reload can never interleave.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{ElevationState, Inventory, RemovalOutcome, SessionState, Startup};
use crate::events::SessionEvent;
use crate::inventory::parse_driver_listing;
use crate::ports::{
    CommandRunner, ElevationPort, InventoryError, SessionError, SessionEventEmitter,
};
use crate::services::{DriverEnumerator, RemovalExecutor};
use crate::settings::Settings;

/// Everything a session needs from the outside world.
#[derive(Clone)]
pub struct SessionDeps {
    /// Runs the driver utility.
    pub runner: Arc<dyn CommandRunner>,
    /// Privilege checks and self-relaunch.
    pub elevation: Arc<dyn ElevationPort>,
    /// Receives progress and per-item outcomes.
    pub events: Arc<dyn SessionEventEmitter>,
    /// Utility path and related options.
    pub settings: Settings,
}

/// Result of one `remove_selected` call.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// One outcome per attempted package, in request order.
    pub outcomes: Vec<RemovalOutcome>,
    /// The mandatory reload that followed the batch.
    pub refresh: Result<Inventory, InventoryError>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.succeeded)
    }
}

/// Coordinates elevation, enumeration, parsing and removal.
pub struct SessionOrchestrator {
    enumerator: DriverEnumerator,
    executor: RemovalExecutor,
    elevation: Arc<dyn ElevationPort>,
    events: Arc<dyn SessionEventEmitter>,
    startup: OnceLock<Result<Startup, SessionError>>,
    state: RwLock<SessionState>,
    inventory: RwLock<Inventory>,
    op_lock: Mutex<()>,
}

impl SessionOrchestrator {
    pub fn new(deps: SessionDeps) -> Self {
        let utility = deps.settings.utility;
        Self {
            enumerator: DriverEnumerator::new(Arc::clone(&deps.runner), utility.clone()),
            executor: RemovalExecutor::new(deps.runner, Arc::clone(&deps.elevation), utility),
            elevation: deps.elevation,
            events: deps.events,
            startup: OnceLock::new(),
            state: RwLock::new(SessionState::Uninitialized),
            inventory: RwLock::new(Inventory::from(Vec::new())),
            op_lock: Mutex::new(()),
        }
    }

    /// Verify elevation, relaunching elevated if needed.
    ///
    /// The check runs once per orchestrator; later calls return the first
    /// answer. [`Startup::Relaunched`] means the caller must exit without
    /// entering the session.
    pub fn start(&self) -> Result<Startup, SessionError> {
        self.startup.get_or_init(|| self.check_elevation()).clone()
    }

    fn check_elevation(&self) -> Result<Startup, SessionError> {
        if self.elevation.is_elevated() {
            debug!("Process is elevated");
            return Ok(Startup::Elevated);
        }

        info!("Process is not elevated; requesting an elevated relaunch");
        self.elevation.relaunch_elevated()?;
        Ok(Startup::Relaunched)
    }

    /// Elevation as determined by [`Self::start`], if it has run.
    pub fn elevation_state(&self) -> Option<ElevationState> {
        self.startup.get().map(|startup| {
            ElevationState::from_bool(matches!(startup, Ok(Startup::Elevated)))
        })
    }

    pub fn state(&self) -> SessionState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current snapshot: the last successful load, or empty.
    pub fn inventory(&self) -> Inventory {
        Arc::clone(&self.inventory.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Enumerate and parse, replacing the snapshot on success.
    ///
    /// On failure the previous snapshot stays current and the session
    /// returns to its previous stable state, so the caller may retry.
    pub async fn load_inventory(&self) -> Result<Inventory, SessionError> {
        let _guard = self.op_lock.lock().await;
        Ok(self.load_locked().await?)
    }

    /// Remove each selected package in order, then reload.
    ///
    /// Duplicates are attempted once, blanks are ignored. Every item is
    /// attempted regardless of earlier failures, and exactly one reload
    /// follows the last attempt.
    pub async fn remove_selected<I, S>(&self, package_names: I) -> Result<BatchReport, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selection = normalize_selection(package_names);
        if selection.is_empty() {
            return Err(SessionError::NoSelection);
        }

        let _guard = self.op_lock.lock().await;
        info!(count = selection.len(), "Starting removal batch");

        let mut outcomes = Vec::with_capacity(selection.len());
        for name in &selection {
            self.events.emit(SessionEvent::removal_started(name.as_str()));
            let outcome = self.executor.remove(name).await;
            self.events.emit(SessionEvent::removal_completed(outcome.clone()));
            outcomes.push(outcome);
        }

        let succeeded = outcomes.iter().filter(|o| o.succeeded).count();
        self.events.emit(SessionEvent::BatchFinished {
            attempted: outcomes.len(),
            succeeded,
        });
        info!(attempted = outcomes.len(), succeeded, "Removal batch finished");

        let refresh = self.load_locked().await;
        Ok(BatchReport { outcomes, refresh })
    }

    /// Run [`Self::load_inventory`] on the runtime's worker pool.
    pub fn spawn_load(self: &Arc<Self>) -> JoinHandle<Result<Inventory, SessionError>> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.load_inventory().await })
    }

    /// Run [`Self::remove_selected`] on the runtime's worker pool.
    ///
    /// Per-item outcomes arrive through the event emitter while the batch
    /// runs; the handle resolves after the follow-up reload.
    pub fn spawn_remove(
        self: &Arc<Self>,
        package_names: Vec<String>,
    ) -> JoinHandle<Result<BatchReport, SessionError>> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.remove_selected(package_names).await })
    }

    async fn load_locked(&self) -> Result<Inventory, InventoryError> {
        let previous = self.transition(SessionState::Loading);

        match self.fetch().await {
            Ok(inventory) => {
                *self
                    .inventory
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = Arc::clone(&inventory);
                self.transition(SessionState::Ready);

                let unused = inventory.iter().filter(|r| r.is_unused()).count();
                info!(count = inventory.len(), unused, "Driver inventory loaded");
                self.events.emit(SessionEvent::InventoryLoaded {
                    count: inventory.len(),
                    unused,
                });
                Ok(inventory)
            }
            Err(err) => {
                let fallback = if previous == SessionState::Ready {
                    SessionState::Ready
                } else {
                    SessionState::Uninitialized
                };
                self.transition(fallback);

                warn!(error = %err, "Driver inventory load failed");
                self.events.emit(SessionEvent::InventoryFailed {
                    category: err.category(),
                    diagnostic: err.diagnostic(),
                });
                Err(err)
            }
        }
    }

    async fn fetch(&self) -> Result<Inventory, InventoryError> {
        let xml = self.enumerator.enumerate().await?;
        let records = parse_driver_listing(&xml)?;
        Ok(Inventory::from(records))
    }

    /// Set a new state and return the one it replaced.
    fn transition(&self, next: SessionState) -> SessionState {
        let previous = std::mem::replace(
            &mut *self.state.write().unwrap_or_else(PoisonError::into_inner),
            next,
        );
        if previous != next {
            debug!(?previous, ?next, "Session state changed");
            self.events.emit(SessionEvent::state_changed(next));
        }
        previous
    }
}

/// Trim, drop blanks and de-duplicate while keeping first-seen order.
fn normalize_selection<I, S>(package_names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut selection: Vec<String> = Vec::new();
    for name in package_names {
        let name = name.as_ref().trim();
        if !name.is_empty() && !selection.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
            selection.push(name.to_string());
        }
    }
    selection
}
