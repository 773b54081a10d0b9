//! Command handlers that delegate to the session orchestrator.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Call orchestrator methods
//!   3. Format output for the terminal
//!
//! Handlers should NOT:
//! - Run the driver utility directly
//! - Mutate the inventory snapshot

pub mod interactive;
pub mod list;
pub mod remove;
pub mod status;

use anyhow::{Context, Result};
use drvsweep_core::{BatchReport, Inventory, SessionEvent};
use indicatif::ProgressBar;
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{print_outcome, spinner};

/// Load the inventory behind a spinner.
pub async fn load_inventory(ctx: &CliContext) -> Result<Inventory> {
    let pb = spinner("Loading driver packages...");
    let result = ctx.session().spawn_load().await;
    pb.finish_and_clear();

    let inventory = result
        .context("Driver inventory task failed")?
        .map_err(CliError::from)?;
    Ok(inventory)
}

/// Run a removal batch, printing each outcome as it arrives.
///
/// Session events are drained on this task while the batch runs on a
/// worker; the report resolves after the follow-up reload.
pub async fn run_removal(ctx: &CliContext, package_names: Vec<String>) -> Result<BatchReport> {
    let mut events = ctx.events().lock().await;
    while events.try_recv().is_ok() {}

    let mut batch = ctx.session().spawn_remove(package_names);
    let mut pb: Option<ProgressBar> = None;

    let joined = loop {
        tokio::select! {
            biased;
            Some(event) = events.recv() => match event {
                SessionEvent::RemovalStarted { package_name } => {
                    pb = Some(spinner(format!("Removing {package_name}...")));
                }
                SessionEvent::RemovalCompleted { outcome } => {
                    if let Some(pb) = pb.take() {
                        pb.finish_and_clear();
                    }
                    print_outcome(&outcome);
                }
                SessionEvent::BatchFinished { attempted, succeeded } => {
                    debug!(attempted, succeeded, "Batch finished; reloading");
                    pb = Some(spinner("Reloading driver packages..."));
                }
                _ => {}
            },
            joined = &mut batch => break joined,
        }
    };

    if let Some(pb) = pb.take() {
        pb.finish_and_clear();
    }

    let report = joined
        .context("Driver removal task failed")?
        .map_err(CliError::from)?;
    Ok(report)
}

/// Print the batch summary and turn failures into an error.
///
/// A failed reload after the batch is reported but only becomes the
/// error when every removal succeeded.
pub fn finish_batch(report: &BatchReport) -> Result<(), CliError> {
    println!();
    println!(
        "{} of {} driver package(s) removed.",
        report.succeeded(),
        report.outcomes.len()
    );

    if let Err(err) = &report.refresh {
        eprintln!("Warning: the driver list could not be refreshed: {err}");
    }

    if !report.all_succeeded() {
        return Err(CliError::RemovalFailed {
            failed: report.failed(),
            attempted: report.outcomes.len(),
        });
    }
    if let Err(err) = &report.refresh {
        return Err(err.clone().into());
    }
    Ok(())
}
