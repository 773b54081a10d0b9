//! List command handler.
//!
//! Displays the OEM driver packages in a formatted table.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::handlers::load_inventory;
use crate::presentation::{SortColumn, print_driver_table, select_rows};

/// Options for the list command.
#[derive(Debug, Clone, Copy)]
pub struct ListArgs {
    pub unused: bool,
    pub sort: SortColumn,
    pub reverse: bool,
    pub json: bool,
}

/// Execute the list command.
///
/// Loads a fresh inventory and prints it as a table (or JSON), followed
/// by the total and unused counts.
pub async fn execute(ctx: &CliContext, args: ListArgs) -> Result<()> {
    let inventory = load_inventory(ctx).await?;
    let rows = select_rows(&inventory, args.unused, args.sort, args.reverse);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        if args.unused {
            println!("No unused OEM driver packages found.");
        } else {
            println!("No OEM driver packages found.");
        }
        return Ok(());
    }

    print_driver_table(&rows);
    println!();

    let unused = inventory.iter().filter(|r| r.is_unused()).count();
    println!(
        "Total: {} package(s) shown, {} OEM package(s), {} unused.",
        rows.len(),
        inventory.len(),
        unused
    );
    if unused > 0 && !args.unused {
        println!("Use 'drvsweep remove --all-unused' to remove the unused ones.");
    }

    Ok(())
}
