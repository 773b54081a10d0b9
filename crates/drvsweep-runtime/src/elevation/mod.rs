//! Administrative privilege checks and elevated self-relaunch.
//!
//! On Windows the check reads the process token and relaunch goes through
//! the shell's `runas` verb, which raises the UAC prompt. Elsewhere the
//! check is "effective uid is root" and relaunch is not offered.

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod win32;

use std::ffi::OsString;

use drvsweep_core::ports::{ElevationError, ElevationPort};
use tracing::{debug, info};

/// [`ElevationPort`] for the host operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemElevation;

impl SystemElevation {
    pub const fn new() -> Self {
        Self
    }
}

impl ElevationPort for SystemElevation {
    fn is_elevated(&self) -> bool {
        #[cfg(windows)]
        let elevated = win32::is_elevated();
        #[cfg(unix)]
        let elevated = unix::is_elevated();
        #[cfg(not(any(windows, unix)))]
        let elevated = false;

        debug!(elevated, "Checked process elevation");
        elevated
    }

    fn relaunch_elevated(&self) -> Result<(), ElevationError> {
        let program = std::env::current_exe().map_err(|e| {
            ElevationError::Refused(format!("Cannot locate the running executable: {e}"))
        })?;
        let arguments = join_os_arguments(std::env::args_os().skip(1));
        info!(program = %program.display(), %arguments, "Requesting elevated relaunch");

        #[cfg(windows)]
        return win32::relaunch(&program, &arguments);

        #[cfg(not(windows))]
        {
            Err(ElevationError::Unsupported(format!(
                "re-run {} as root (for example with sudo)",
                program.display()
            )))
        }
    }
}

/// Quote one argument so the Windows command-line parser reads it back
/// unchanged.
///
/// Arguments without whitespace or quotes pass through as-is. Otherwise
/// the argument is wrapped in quotes, embedded quotes are escaped and
/// backslashes that precede a quote are doubled.
pub fn quote_argument(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(|c| c.is_whitespace() || c == '"') {
        return arg.to_string();
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0usize;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(std::iter::repeat_n('\\', backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                quoted.extend(std::iter::repeat_n('\\', backslashes));
                quoted.push(c);
                backslashes = 0;
            }
        }
    }
    quoted.extend(std::iter::repeat_n('\\', backslashes * 2));
    quoted.push('"');
    quoted
}

fn join_arguments<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| quote_argument(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`join_arguments`] over raw OS arguments, replacing anything that is
/// not valid Unicode.
fn join_os_arguments<I>(args: I) -> String
where
    I: IntoIterator<Item = OsString>,
{
    join_arguments(args.into_iter().map(|arg| arg.to_string_lossy().into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_arguments_untouched() {
        assert_eq!(quote_argument("remove"), "remove");
        assert_eq!(quote_argument("oem12.inf"), "oem12.inf");
        assert_eq!(quote_argument(r"C:\Windows\pnputil.exe"), r"C:\Windows\pnputil.exe");
    }

    #[test]
    fn test_whitespace_and_empty_are_quoted() {
        assert_eq!(quote_argument(""), "\"\"");
        assert_eq!(
            quote_argument(r"C:\Program Files\tool.exe"),
            r#""C:\Program Files\tool.exe""#
        );
    }

    #[test]
    fn test_embedded_quotes_and_trailing_backslashes() {
        assert_eq!(quote_argument(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote_argument(r"dir with\ "), r#""dir with\ ""#);
        assert_eq!(quote_argument(r"end\"), r"end\");
        assert_eq!(quote_argument(r"a b\"), r#""a b\\""#);
    }

    #[test]
    fn test_join_arguments() {
        assert_eq!(
            join_arguments(["remove", "oem1.inf", "two words"]),
            r#"remove oem1.inf "two words""#
        );
        assert_eq!(join_arguments(Vec::<String>::new()), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_arguments_are_replaced() {
        use std::os::unix::ffi::OsStringExt;

        let args = [
            OsString::from("remove"),
            OsString::from_vec(vec![b'o', b'e', b'm', 0xFF, b'.', b'i', b'n', b'f']),
        ];
        assert_eq!(join_os_arguments(args), "remove oem\u{FFFD}.inf");
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_relaunch_is_unsupported() {
        let err = SystemElevation::new().relaunch_elevated().unwrap_err();
        assert!(matches!(err, ElevationError::Unsupported(_)));
    }
}
