//! Shell32 calls for the token check and the `runas` relaunch.
#![allow(unsafe_code)]

use std::path::Path;

use drvsweep_core::ports::ElevationError;
use tracing::warn;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Shell::{IsUserAnAdmin, ShellExecuteW};
use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;
use windows::core::{HSTRING, PCWSTR, w};

/// `ShellExecuteW` reports failure as a value no greater than this.
const SHELL_EXECUTE_FAILURE_MAX: isize = 32;

/// `SE_ERR_ACCESSDENIED`, also returned when the UAC prompt is declined.
const SE_ERR_ACCESSDENIED: isize = 5;

pub(super) fn is_elevated() -> bool {
    // SAFETY: takes no arguments and only reads the current process token.
    unsafe { IsUserAnAdmin() }.as_bool()
}

pub(super) fn relaunch(program: &Path, arguments: &str) -> Result<(), ElevationError> {
    let file = HSTRING::from(program.as_os_str());
    let parameters = HSTRING::from(arguments);

    // SAFETY: every string pointer is backed by an HSTRING or a static
    // literal that outlives the call.
    let instance = unsafe {
        ShellExecuteW(
            HWND::default(),
            w!("runas"),
            PCWSTR(file.as_ptr()),
            PCWSTR(parameters.as_ptr()),
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };

    let code = instance.0 as isize;
    if code > SHELL_EXECUTE_FAILURE_MAX {
        return Ok(());
    }

    warn!(code, "Elevated relaunch failed");
    let reason = if code == SE_ERR_ACCESSDENIED {
        "the elevation prompt was declined".to_string()
    } else {
        format!("ShellExecute failed with code {code}")
    };
    Err(ElevationError::Refused(reason))
}
