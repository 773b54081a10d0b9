//! Remove command handler.
//!
//! Removes the selected driver packages one at a time, uninstalling them
//! from any device still bound, then reloads the inventory.

use anyhow::Result;
use drvsweep_core::{DriverRecord, SessionError};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::{finish_batch, load_inventory, run_removal};
use crate::utils::input;

/// Options for the remove command.
#[derive(Debug, Clone)]
pub struct RemoveArgs {
    pub packages: Vec<String>,
    pub all_unused: bool,
    pub yes: bool,
}

/// Execute the remove command.
///
/// Loads the inventory so the selection can be shown with its details,
/// confirms unless `yes` is set, then runs the batch.
///
/// # Errors
///
/// - `NoSelection` if nothing remains after expansion
/// - `RemovalFailed` if any package could not be removed
pub async fn execute(ctx: &CliContext, args: RemoveArgs) -> Result<()> {
    let inventory = load_inventory(ctx).await?;
    let selection = build_selection(&inventory, &args.packages, args.all_unused);

    if selection.is_empty() {
        if args.all_unused && args.packages.is_empty() {
            println!("No unused OEM driver packages found. Nothing to remove.");
            return Ok(());
        }
        return Err(CliError::from(SessionError::NoSelection).into());
    }

    println!("Selected {} driver package(s):", selection.len());
    for name in &selection {
        println!("  {}", describe(name, &inventory));
    }
    println!();

    if !args.yes
        && !input::prompt_confirmation("Remove these driver packages? Devices using them will be uninstalled")?
    {
        println!("Remove operation cancelled.");
        return Ok(());
    }

    let report = run_removal(ctx, selection).await?;
    finish_batch(&report)?;
    Ok(())
}

/// Explicit names first, then unused packages not already named.
fn build_selection(records: &[DriverRecord], packages: &[String], all_unused: bool) -> Vec<String> {
    let mut selection: Vec<String> = Vec::new();
    let named = packages.iter().map(|name| name.trim().to_string());
    let unused = records
        .iter()
        .filter(|r| all_unused && r.is_unused())
        .map(|r| r.package_name.clone());

    for name in named.chain(unused) {
        if !name.is_empty() && !selection.iter().any(|seen| seen.eq_ignore_ascii_case(&name)) {
            selection.push(name);
        }
    }
    selection
}

fn describe(name: &str, records: &[DriverRecord]) -> String {
    records
        .iter()
        .find(|r| r.package_name.eq_ignore_ascii_case(name))
        .map_or_else(
            || format!("{name}  (not in the current driver list)"),
            |r| {
                format!(
                    "{}  {} / {} / {}  [{} device(s)]",
                    r.package_name, r.original_name, r.provider_name, r.class_name, r.usage_count
                )
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use drvsweep_core::DriverOrigin;

    fn record(name: &str, devices: u32) -> DriverRecord {
        DriverRecord {
            package_name: name.to_string(),
            original_name: "net.inf".to_string(),
            provider_name: "Acme".to_string(),
            class_name: "Net".to_string(),
            usage_count: devices,
            origin: DriverOrigin::Oem,
        }
    }

    #[test]
    fn test_selection_named_then_unused() {
        let records = [record("oem1.inf", 0), record("oem2.inf", 1), record("oem3.inf", 0)];
        let packages = vec!["oem2.inf".to_string(), "OEM3.inf".to_string()];

        assert_eq!(
            build_selection(&records, &packages, true),
            ["oem2.inf", "OEM3.inf", "oem1.inf"]
        );
        assert_eq!(build_selection(&records, &packages, false), ["oem2.inf", "OEM3.inf"]);
        assert_eq!(build_selection(&records, &[], true), ["oem1.inf", "oem3.inf"]);
    }

    #[test]
    fn test_blank_names_dropped() {
        let packages = vec!["  ".to_string()];
        assert!(build_selection(&[], &packages, false).is_empty());
    }

    #[test]
    fn test_describe_unknown_package() {
        let records = [record("oem1.inf", 2)];
        assert_eq!(
            describe("oem1.inf", &records),
            "oem1.inf  net.inf / Acme / Net  [2 device(s)]"
        );
        assert!(describe("oem9.inf", &records).contains("not in the current driver list"));
    }
}
