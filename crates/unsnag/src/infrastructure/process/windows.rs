//! Win32 side of process setup.

use tracing::debug;
use windows::core::HSTRING;
use windows::Win32::Foundation::{CloseHandle, GetLastError, ERROR_ALREADY_EXISTS, HANDLE};
use windows::Win32::System::Threading::CreateMutexW;
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};

use super::ProcessError;

pub(super) fn enable_dpi_awareness() {
    // SAFETY: takes a predefined context constant; no pointers involved.
    match unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) } {
        Ok(()) => debug!("per-monitor DPI awareness enabled"),
        Err(e) => debug!(error = %e, "DPI awareness unchanged"),
    }
}

/// Owned handle to a named mutex, closed on drop.
#[derive(Debug)]
pub(super) struct InstanceMutex {
    handle: HANDLE,
}

impl InstanceMutex {
    /// Creates (or opens) the named mutex.  Returns `None` when it already
    /// existed, i.e. another instance is running.
    pub(super) fn create(name: &str) -> Result<Option<Self>, ProcessError> {
        let name = HSTRING::from(name);
        // SAFETY: `name` outlives the call; default security attributes.
        let handle = unsafe { CreateMutexW(None, false, &name) }
            .map_err(|e| ProcessError::MutexCreateFailed(e.to_string()))?;

        // SAFETY: no preconditions; reads this thread's last-error value,
        // which CreateMutexW sets even on success.
        if unsafe { GetLastError() } == ERROR_ALREADY_EXISTS {
            // SAFETY: `handle` is a valid handle we own.
            unsafe {
                let _ = CloseHandle(handle);
            }
            return Ok(None);
        }

        Ok(Some(Self { handle }))
    }
}

impl Drop for InstanceMutex {
    fn drop(&mut self) {
        // SAFETY: `handle` came from CreateMutexW and is closed exactly once.
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}
