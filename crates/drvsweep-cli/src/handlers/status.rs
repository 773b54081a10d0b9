//! Status command handler.

use anyhow::Result;
use drvsweep_core::ElevationState;

use crate::bootstrap::CliContext;

/// Print elevation state and the resolved settings.
///
/// Runs without elevation and never touches the driver utility.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let elevation = ElevationState::from_bool(ctx.elevation().is_elevated());
    let settings = ctx.settings();

    println!("Elevated:        {}", if elevation.is_elevated() { "yes" } else { "no" });
    println!("Driver utility:  {}", settings.utility);
    match settings.timeout_secs {
        Some(secs) => println!("Timeout:         {secs}s"),
        None => println!("Timeout:         none"),
    }

    if !elevation.is_elevated() {
        println!();
        println!("Other commands request administrator rights when they start.");
    }
    Ok(())
}
