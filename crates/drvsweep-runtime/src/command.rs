//! Child-process execution for the driver utility.
//!
//! Each invocation runs with no console window, null stdin and both
//! streams captured. A configured timeout kills the child when it fires.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use drvsweep_core::ports::{CommandError, CommandRunner, ToolInvocation, ToolOutput};
use tokio::process::Command;
use tracing::debug;

/// Suppresses the console window a console program would otherwise open.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// [`CommandRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct TokioCommandRunner {
    timeout: Option<Duration>,
}

impl TokioCommandRunner {
    pub const fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn command(invocation: &ToolInvocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        command
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, CommandError> {
        debug!(command = %invocation, "Spawning process");
        let pending = Self::command(invocation).output();

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, pending).await.map_err(|_| {
                CommandError::TimedOut {
                    program: invocation.program.clone(),
                    seconds: limit.as_secs(),
                }
            })?,
            None => pending.await,
        };

        let output = result.map_err(|e| CommandError::Launch {
            program: invocation.program.clone(),
            reason: e.to_string(),
        })?;

        let output = ToolOutput {
            exit_code: output.status.code(),
            stdout: decode_stream(&output.stdout),
            stderr: decode_stream(&output.stderr),
        };
        debug!(
            program = %invocation.program,
            exit_code = ?output.exit_code,
            stdout_bytes = output.stdout.len(),
            "Process finished"
        );
        Ok(output)
    }
}

/// Decode captured bytes, honouring a UTF-16LE byte order mark.
///
/// Anything else is treated as UTF-8, replacing invalid sequences. A
/// trailing odd byte of UTF-16 output decodes as U+FFFD.
fn decode_stream(bytes: &[u8]) -> String {
    if let Some(wide) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let pairs = wide.chunks_exact(2);
        let truncated = !pairs.remainder().is_empty();
        let units: Vec<u16> = pairs
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        let mut text = String::from_utf16_lossy(&units);
        if truncated {
            text.push(char::REPLACEMENT_CHARACTER);
        }
        return text;
    }
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_stream(b"<PnpUtil/>"), "<PnpUtil/>");
        assert_eq!(decode_stream(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
        assert_eq!(decode_stream(&[]), "");
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<Driver/>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_stream(&bytes), "<Driver/>");
    }

    #[test]
    fn test_decode_utf16_odd_trailing_byte() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "ok".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes.push(b'!');
        assert_eq!(decode_stream(&bytes), "ok\u{FFFD}");
    }

    #[tokio::test]
    async fn test_missing_program_is_launch_error() {
        let runner = TokioCommandRunner::default();
        let invocation = ToolInvocation::new("drvsweep-no-such-program-7f3a");
        let err = runner.run(&invocation).await.unwrap_err();
        assert!(matches!(err, CommandError::Launch { ref program, .. } if program == "drvsweep-no-such-program-7f3a"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_streams_and_exit_code() {
        let runner = TokioCommandRunner::new(Some(Duration::from_secs(10)));
        let invocation = ToolInvocation::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]);

        let output = runner.run(&invocation).await.unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_arguments_are_not_shell_expanded() {
        let runner = TokioCommandRunner::default();
        let invocation = ToolInvocation::new("sh").args(["-c", "printf '%s' \"$1\"", "sh", "oem1.inf $HOME *"]);

        let output = runner.run(&invocation).await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "oem1.inf $HOME *");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_reports_seconds() {
        let runner = TokioCommandRunner::new(Some(Duration::from_secs(1)));
        let invocation = ToolInvocation::new("sh").args(["-c", "sleep 5"]);

        let err = runner.run(&invocation).await.unwrap_err();
        assert_eq!(
            err,
            CommandError::TimedOut {
                program: "sh".to_string(),
                seconds: 1,
            }
        );
    }
}
