//! Command runner trait definition.
//!
//! This port runs one external utility to completion and hands back its
//! exit status and captured streams. Implementations handle spawning,
//! window suppression and timeouts internally.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::CommandError;

/// A program plus its fixed argument list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Program name (resolved on the search path) or full path.
    pub program: String,
    /// Arguments, passed verbatim with no shell in between.
    pub args: Vec<String>,
}

impl ToolInvocation {
    /// Create an invocation with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the process exited with status zero.
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }

    /// Error stream, falling back to the output stream, trimmed.
    ///
    /// Empty when both streams are blank.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }

    /// [`Self::diagnostic`], or a description of the exit status when
    /// both streams are blank.
    pub fn diagnostic_or_status(&self) -> String {
        let diagnostic = self.diagnostic();
        if !diagnostic.is_empty() {
            return diagnostic;
        }
        match self.exit_code {
            Some(code) => format!("exited with code {code}"),
            None => "terminated without an exit code".to_string(),
        }
    }
}

/// Runs external utilities on behalf of core services.
///
/// # Design Rules
///
/// - One call runs one process to completion
/// - Non-zero exit is NOT an error here; it is reported in [`ToolOutput`]
/// - `Err` is reserved for "could not run it at all"
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the invocation and capture both output streams.
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, CommandError>;
}
