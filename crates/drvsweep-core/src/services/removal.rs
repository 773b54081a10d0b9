//! Single-package removal through the driver utility.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::RemovalOutcome;
use crate::ports::{CommandRunner, ElevationPort, ToolInvocation};

/// Diagnostic used when removal is declined for lack of privileges.
pub const NOT_ELEVATED_DIAGNOSTIC: &str =
    "Administrator privileges are required to remove driver packages";

/// Diagnostic used when asked to remove a blank package name.
pub const EMPTY_NAME_DIAGNOSTIC: &str = "Package name is empty";

/// Removes one driver package per call with uninstall + force semantics.
///
/// Never returns an error: every failure, including a failure to launch
/// the utility, is folded into the [`RemovalOutcome`].
pub struct RemovalExecutor {
    runner: Arc<dyn CommandRunner>,
    elevation: Arc<dyn ElevationPort>,
    utility: String,
}

impl RemovalExecutor {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        elevation: Arc<dyn ElevationPort>,
        utility: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            elevation,
            utility: utility.into(),
        }
    }

    pub fn invocation(&self, package_name: &str) -> ToolInvocation {
        ToolInvocation::new(&self.utility).args([
            "/delete-driver",
            package_name,
            "/uninstall",
            "/force",
        ])
    }

    /// Attempt to remove `package_name`.
    ///
    /// Declines without running anything if the process is not elevated.
    /// Whether an in-use package may go is left to the utility itself.
    pub async fn remove(&self, package_name: &str) -> RemovalOutcome {
        let package_name = package_name.trim();
        if package_name.is_empty() {
            return RemovalOutcome::failure(package_name, EMPTY_NAME_DIAGNOSTIC);
        }

        if !self.elevation.is_elevated() {
            warn!(package = %package_name, "Refusing removal: process is not elevated");
            return RemovalOutcome::failure(package_name, NOT_ELEVATED_DIAGNOSTIC);
        }

        let invocation = self.invocation(package_name);
        match self.runner.run(&invocation).await {
            Ok(output) if output.success() => {
                info!(package = %package_name, "Driver package removed");
                RemovalOutcome::success(package_name)
            }
            Ok(output) => {
                let diagnostic = output.diagnostic_or_status();
                warn!(
                    package = %package_name,
                    exit_code = ?output.exit_code,
                    %diagnostic,
                    "Driver package removal failed"
                );
                RemovalOutcome::failure(package_name, diagnostic)
            }
            Err(err) => {
                warn!(package = %package_name, error = %err, "Could not run removal");
                RemovalOutcome::failure(package_name, err.to_string())
            }
        }
    }
}
