//! Process-wide setup: DPI awareness and the single-instance guard.
//!
//! Both only mean something on Windows.  Elsewhere DPI awareness is a no-op
//! and the single-instance guard is always granted, so callers need no
//! `#[cfg]` of their own.

use thiserror::Error;

#[cfg(target_os = "windows")]
mod windows;

/// Name of the mutex that marks a running daemon.
pub const INSTANCE_MUTEX_NAME: &str = "__Unsnag_EXE__";

/// Error type for process setup.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to create instance mutex: {0}")]
    MutexCreateFailed(String),
}

/// Opts the process into per-monitor DPI awareness.
///
/// Without it Windows reports scaled monitor rectangles and cursor positions
/// on high-DPI monitors, which no longer line up with the hook's raw samples.
/// Failure is ignored: systems without per-monitor v2 work in physical pixels
/// already.
pub fn enable_dpi_awareness() {
    #[cfg(target_os = "windows")]
    windows::enable_dpi_awareness();
}

/// Holds the process-wide instance marker for as long as it lives.
#[derive(Debug)]
pub struct SingleInstanceGuard {
    #[cfg(target_os = "windows")]
    _mutex: windows::InstanceMutex,
}

impl SingleInstanceGuard {
    /// Claims the instance marker named `name`.
    ///
    /// Returns `Ok(None)` when another process already holds it.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::MutexCreateFailed`] when the OS call fails.
    pub fn acquire(name: &str) -> Result<Option<Self>, ProcessError> {
        #[cfg(target_os = "windows")]
        {
            Ok(windows::InstanceMutex::create(name)?.map(|mutex| Self { _mutex: mutex }))
        }

        #[cfg(not(target_os = "windows"))]
        {
            let _ = name;
            Ok(Some(Self {}))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
