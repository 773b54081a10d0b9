//! Structured driver enumeration.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::ports::{CommandRunner, EnumerationError, ToolInvocation};

/// Arguments requesting every driver package, its bound devices, and XML
/// output. The default text format is localized and is never requested.
pub const ENUMERATE_ARGS: [&str; 4] = ["/enum-drivers", "/devices", "/format", "xml"];

/// Runs the listing utility and returns its raw XML.
pub struct DriverEnumerator {
    runner: Arc<dyn CommandRunner>,
    utility: String,
}

impl DriverEnumerator {
    pub fn new(runner: Arc<dyn CommandRunner>, utility: impl Into<String>) -> Self {
        Self {
            runner,
            utility: utility.into(),
        }
    }

    pub fn invocation(&self) -> ToolInvocation {
        ToolInvocation::new(&self.utility).args(ENUMERATE_ARGS)
    }

    /// Run the enumeration.
    ///
    /// Read-only. A non-zero exit becomes [`EnumerationError::Failed`]
    /// carrying stderr, else stdout, else the exit status.
    pub async fn enumerate(&self) -> Result<String, EnumerationError> {
        let invocation = self.invocation();
        debug!(command = %invocation, "Enumerating driver packages");

        let output = self.runner.run(&invocation).await?;
        if output.success() {
            debug!(bytes = output.stdout.len(), "Driver enumeration finished");
            return Ok(output.stdout);
        }

        let diagnostic = output.diagnostic_or_status();
        warn!(exit_code = ?output.exit_code, %diagnostic, "Driver enumeration failed");
        Err(EnumerationError::Failed {
            exit_code: output.exit_code,
            diagnostic,
        })
    }
}
