//! Platform-specific monitor enumeration.
//!
//! Detects the connected monitors and their positions on the virtual desktop
//! so the screen registry can be rebuilt whenever the arrangement changes.
//!
//! # Why does the daemon need every monitor rectangle?
//!
//! The jump decision works on the geometry of the whole desktop:
//! - which monitor the cursor is on,
//! - which monitor lies beyond the edge it is pushed against,
//! - where the outermost left and right edges are, for wrap-around.
//!
//! This module queries the OS for the monitor rectangles and hands them to
//! `application::update_arrangement`, which rebuilds the registry.
//!
//! # Platform implementations
//!
//! Each platform implements [`PlatformScreenEnumerator`]; the correct one is
//! selected at compile time via `#[cfg(target_os = ...)]` and re-exported as
//! `NativeScreenEnumerator`:
//!
//! | Module    | OS      | API used                                  |
//! |-----------|---------|-------------------------------------------|
//! | `windows` | Windows | `EnumDisplayMonitors` + `GetMonitorInfoW` |
//!
//! Other platforms have no native enumerator; the daemon reports
//! `UnsupportedPlatform` there.  A [`MockScreenEnumerator`] is always compiled
//! (not guarded by `#[cfg]`) so tests on any platform can use it without a
//! physical display.

use parking_lot::Mutex;
use thiserror::Error;
use unsnag_core::{Rect, ScreenSpec};

/// Error type for screen enumeration operations.
#[derive(Debug, Error)]
pub enum ScreenInfoError {
    /// The platform API call to enumerate monitors failed.
    ///
    /// The inner string contains a human-readable description of the OS
    /// error, e.g. "EnumDisplayMonitors returned no monitors".
    #[error("platform API error while enumerating monitors: {0}")]
    PlatformError(String),
}

/// One monitor as reported by the OS, in virtual-desktop pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Full monitor rectangle (not the work area), half-open.
    pub bounds: Rect,
    pub is_primary: bool,
}

impl From<MonitorInfo> for ScreenSpec {
    fn from(monitor: MonitorInfo) -> Self {
        ScreenSpec {
            bounds: monitor.bounds,
            is_primary: monitor.is_primary,
        }
    }
}

/// Trait for enumerating monitors on the current platform.
pub trait PlatformScreenEnumerator: Send + Sync {
    /// Returns the connected monitors in OS enumeration order.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenInfoError::PlatformError`] if the OS API call fails.
    fn enumerate_monitors(&self) -> Result<Vec<MonitorInfo>, ScreenInfoError>;
}

// ── Windows implementation ────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
pub mod windows;

/// Re-export the Windows enumerator as `NativeScreenEnumerator` on Windows.
#[cfg(target_os = "windows")]
pub use windows::WindowsScreenEnumerator as NativeScreenEnumerator;

// ── Mock implementation (always compiled for tests) ───────────────────────────

/// A mock screen enumerator returning a configurable list of monitors.
///
/// The list can be replaced at runtime with [`set_monitors`], which is how
/// tests simulate a monitor being plugged in or rearranged.
///
/// [`set_monitors`]: MockScreenEnumerator::set_monitors
#[derive(Debug, Default)]
pub struct MockScreenEnumerator {
    monitors: Mutex<Vec<MonitorInfo>>,
}

impl MockScreenEnumerator {
    pub fn new(monitors: Vec<MonitorInfo>) -> Self {
        Self {
            monitors: Mutex::new(monitors),
        }
    }

    /// A single 1920×1080 primary monitor at the origin.
    pub fn single_1080p() -> Self {
        Self::new(vec![MonitorInfo {
            bounds: Rect::from_ltrb(0, 0, 1920, 1080),
            is_primary: true,
        }])
    }

    /// A 1920×1080 primary with a 2560×1440 monitor to its right, raised so
    /// their bottom edges line up.  The right monitor's upper 360 rows have no
    /// neighbour on the left: the classic snag.
    pub fn mixed_pair() -> Self {
        Self::new(vec![
            MonitorInfo {
                bounds: Rect::from_ltrb(0, 0, 1920, 1080),
                is_primary: true,
            },
            MonitorInfo {
                bounds: Rect::from_ltrb(1920, -360, 4480, 1080),
                is_primary: false,
            },
        ])
    }

    /// Replaces the list returned by subsequent enumerations.
    pub fn set_monitors(&self, monitors: Vec<MonitorInfo>) {
        *self.monitors.lock() = monitors;
    }
}

impl PlatformScreenEnumerator for MockScreenEnumerator {
    /// Returns the current list (never fails).
    fn enumerate_monitors(&self) -> Result<Vec<MonitorInfo>, ScreenInfoError> {
        Ok(self.monitors.lock().clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_enumerator_single_1080p_returns_one_primary_monitor() {
        // Arrange
        let enumerator = MockScreenEnumerator::single_1080p();

        // Act
        let monitors = enumerator.enumerate_monitors().expect("enumerate");

        // Assert
        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].bounds.width(), 1920);
        assert_eq!(monitors[0].bounds.height(), 1080);
        assert!(monitors[0].is_primary);
    }

    #[test]
    fn test_mock_enumerator_mixed_pair_has_raised_secondary() {
        let enumerator = MockScreenEnumerator::mixed_pair();

        let monitors = enumerator.enumerate_monitors().expect("enumerate");

        assert_eq!(monitors.len(), 2);
        assert!(!monitors[1].is_primary);
        assert_eq!(monitors[1].bounds.top, -360);
        assert_eq!(monitors[1].bounds.bottom, monitors[0].bounds.bottom);
    }

    #[test]
    fn test_set_monitors_replaces_subsequent_enumerations() {
        // Arrange
        let enumerator = MockScreenEnumerator::single_1080p();

        // Act
        enumerator.set_monitors(Vec::new());

        // Assert
        assert!(enumerator.enumerate_monitors().expect("enumerate").is_empty());
    }

    #[test]
    fn test_monitor_info_converts_into_screen_spec() {
        let monitor = MonitorInfo {
            bounds: Rect::from_ltrb(-1280, 0, 0, 1024),
            is_primary: false,
        };

        let spec = ScreenSpec::from(monitor);

        assert_eq!(spec.bounds, monitor.bounds);
        assert!(!spec.is_primary);
    }
}
