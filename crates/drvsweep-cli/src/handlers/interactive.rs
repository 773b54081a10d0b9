//! Interactive session, used when no subcommand is given.
//!
//! Shows the table, reads a selection, confirms, removes and shows the
//! refreshed table again until the operator enters an empty line.

use anyhow::Result;
use tracing::warn;

use crate::bootstrap::CliContext;
use crate::handlers::{finish_batch, load_inventory, run_removal};
use crate::presentation::{SortColumn, print_driver_table, select_rows};
use crate::utils::{UNUSED_KEYWORD, input, parse_selection};

/// Run the interactive loop.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    load_inventory(ctx).await?;

    loop {
        let inventory = ctx.session().inventory();
        let rows = select_rows(&inventory, false, SortColumn::Package, false);
        let unused = rows.iter().filter(|r| r.is_unused()).count();

        println!();
        if rows.is_empty() {
            println!("No OEM driver packages found.");
            return Ok(());
        }
        print_driver_table(&rows);
        println!();
        println!("{} OEM package(s), {unused} unused.", rows.len());

        let line = input::prompt_string(&format!(
            "Packages to remove (comma or space separated, '{UNUSED_KEYWORD}' for all unused, empty to quit)"
        ))?;
        if line.is_empty() {
            return Ok(());
        }

        let selection = parse_selection(&line, &inventory);
        if selection.is_empty() {
            println!("No driver packages selected.");
            continue;
        }

        println!("Selected: {}", selection.join(", "));
        if !input::prompt_confirmation("Remove these driver packages? Devices using them will be uninstalled")? {
            println!("Remove operation cancelled.");
            continue;
        }

        let report = run_removal(ctx, selection).await?;
        if let Err(err) = finish_batch(&report) {
            // Keep the session open; the operator can retry or quit.
            warn!(error = %err, "Batch finished with errors");
        }
    }
}
