//! Windows monitor enumeration via `EnumDisplayMonitors` / `GetMonitorInfoW`.
//!
//! Coordinates are physical pixels provided the process is per-monitor DPI
//! aware (see `infrastructure::process`); otherwise Windows reports scaled
//! rectangles that do not line up with the hook's raw samples.

use unsnag_core::Rect;
use windows::{
    core::BOOL,
    Win32::Foundation::{LPARAM, RECT},
    Win32::Graphics::Gdi::{
        EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO, MONITORINFOF_PRIMARY,
    },
};

use super::{MonitorInfo, PlatformScreenEnumerator, ScreenInfoError};

/// Windows implementation of [`PlatformScreenEnumerator`] using Win32 APIs.
#[derive(Debug, Default)]
pub struct WindowsScreenEnumerator;

impl WindowsScreenEnumerator {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformScreenEnumerator for WindowsScreenEnumerator {
    fn enumerate_monitors(&self) -> Result<Vec<MonitorInfo>, ScreenInfoError> {
        let mut monitors: Vec<MonitorInfo> = Vec::new();

        // SAFETY: `monitor_enum_proc` has the MONITORENUMPROC signature.
        // `lParam` points at `monitors`, which outlives this synchronous call.
        // A null HDC enumerates every monitor on the virtual desktop.
        let ok = unsafe {
            EnumDisplayMonitors(
                None,
                None,
                Some(monitor_enum_proc),
                LPARAM(&mut monitors as *mut Vec<MonitorInfo> as isize),
            )
        };

        if !ok.as_bool() {
            return Err(ScreenInfoError::PlatformError(
                "EnumDisplayMonitors failed".to_string(),
            ));
        }
        if monitors.is_empty() {
            return Err(ScreenInfoError::PlatformError(
                "EnumDisplayMonitors returned no monitors".to_string(),
            ));
        }

        Ok(monitors)
    }
}

/// Win32 monitor enumeration callback.
///
/// # Safety
///
/// Called by Win32 inside `EnumDisplayMonitors`. `lparam` must be a valid
/// pointer to `Vec<MonitorInfo>` for the duration of the enumeration call.
unsafe extern "system" fn monitor_enum_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _lprc_clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let monitors = &mut *(lparam.0 as *mut Vec<MonitorInfo>);

    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    // SAFETY: `hmonitor` is a valid handle provided by Win32.
    if GetMonitorInfoW(hmonitor, &mut info).as_bool() {
        let rc = info.rcMonitor;
        monitors.push(MonitorInfo {
            bounds: Rect::from_ltrb(rc.left, rc.top, rc.right, rc.bottom),
            is_primary: (info.dwFlags & MONITORINFOF_PRIMARY) != 0,
        });
    }

    BOOL(1) // continue enumeration
}

// ── Tests ─────────────────────────────────────────────────────────────────────
