//! Applies monitor arrangement changes to the screen registry.
//!
//! The main entry point is [`apply_arrangement`], which converts a list of
//! enumerated monitors into a new registry snapshot and logs the result.
//! [`ArrangementWatcher`] wraps it with change detection so the daemon can
//! poll the OS on a timer and rebuild only when something actually changed.
//!
//! # Why poll? (for beginners)
//!
//! Windows announces display changes with a `WM_DISPLAYCHANGE` broadcast to
//! top-level windows.  The daemon has no window, so instead it asks the OS
//! for the monitor list every few hundred milliseconds and compares it with
//! the last one it applied.  Enumerating a handful of monitors is cheap, and
//! a rebuild in between two pointer samples is invisible to the hook thread
//! because the registry swaps whole snapshots.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use unsnag_core::{LayoutError, ScreenRegistry};

use crate::infrastructure::screen_info::{MonitorInfo, PlatformScreenEnumerator, ScreenInfoError};

/// Error type for arrangement updates.
#[derive(Debug, Error)]
pub enum ArrangementError {
    #[error("monitor enumeration failed: {0}")]
    Enumerate(#[from] ScreenInfoError),
    #[error("arrangement rejected: {0}")]
    Layout(#[from] LayoutError),
}

/// Rebuilds `registry` from `monitors` and logs every screen of the result.
///
/// # Errors
///
/// Returns the [`LayoutError`] from the rebuild; the previous snapshot stays
/// in effect.
pub fn apply_arrangement(
    registry: &ScreenRegistry,
    monitors: &[MonitorInfo],
) -> Result<u64, LayoutError> {
    match registry.init(monitors.iter().copied()) {
        Ok(version) => {
            let screens = registry.snapshot();
            info!(
                version,
                count = screens.len(),
                desktop = ?screens.bounding_box(),
                "screen arrangement applied"
            );
            for screen in screens.screens() {
                info!(
                    screen = %screen.id,
                    bounds = %screen.bounds,
                    primary = screen.is_primary,
                    "screen"
                );
            }
            Ok(version)
        }
        Err(e) => {
            warn!(error = %e, "screen arrangement rejected; keeping previous one");
            Err(e)
        }
    }
}

/// Polls an enumerator and rebuilds the registry when the monitor list
/// changes.
pub struct ArrangementWatcher {
    registry: Arc<ScreenRegistry>,
    enumerator: Arc<dyn PlatformScreenEnumerator>,
    /// The last list seen, applied or rejected.  `None` until the first poll.
    last_seen: Option<Vec<MonitorInfo>>,
}

impl ArrangementWatcher {
    pub fn new(registry: Arc<ScreenRegistry>, enumerator: Arc<dyn PlatformScreenEnumerator>) -> Self {
        Self {
            registry,
            enumerator,
            last_seen: None,
        }
    }

    /// Enumerates monitors once and rebuilds if the list differs from the
    /// last one seen.
    ///
    /// Returns `Some(version)` after a rebuild and `None` when nothing
    /// changed.  A rejected list is remembered too, so it is not retried on
    /// every tick.
    ///
    /// # Errors
    ///
    /// Returns [`ArrangementError`] when enumeration fails or the new list is
    /// rejected.
    pub fn poll_once(&mut self) -> Result<Option<u64>, ArrangementError> {
        let monitors = self.enumerator.enumerate_monitors()?;
        if self.last_seen.as_ref() == Some(&monitors) {
            return Ok(None);
        }

        debug!(count = monitors.len(), "monitor list changed");
        let result = apply_arrangement(&self.registry, &monitors);
        self.last_seen = Some(monitors);
        Ok(Some(result?))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::screen_info::MockScreenEnumerator;
    use unsnag_core::Rect;

    fn monitor(left: i32, top: i32, right: i32, bottom: i32, is_primary: bool) -> MonitorInfo {
        MonitorInfo {
            bounds: Rect::from_ltrb(left, top, right, bottom),
            is_primary,
        }
    }

    // ── apply_arrangement ─────────────────────────────────────────────────────

    #[test]
    fn test_apply_arrangement_builds_snapshot_in_enumeration_order() {
        // Arrange
        let registry = ScreenRegistry::new();
        let monitors = [
            monitor(0, 0, 1920, 1080, true),
            monitor(-1280, 56, 0, 1080, false),
        ];

        // Act
        let version = apply_arrangement(&registry, &monitors).expect("valid arrangement");

        // Assert
        let screens = registry.snapshot();
        assert_eq!(version, 1);
        assert_eq!(screens.len(), 2);
        assert!(screens.screens()[0].is_primary);
        assert_eq!(screens.screens()[1].bounds, Rect::from_ltrb(-1280, 56, 0, 1080));
    }

    #[test]
    fn test_apply_arrangement_rejects_degenerate_monitor_and_keeps_previous() {
        // Arrange
        let registry = ScreenRegistry::new();
        apply_arrangement(&registry, &[monitor(0, 0, 1920, 1080, true)]).expect("valid");

        // Act
        let result = apply_arrangement(&registry, &[monitor(0, 0, 0, 1080, true)]);

        // Assert
        assert!(matches!(result, Err(LayoutError::InvalidBounds { index: 0, .. })));
        assert_eq!(registry.snapshot().version(), 1);
        assert_eq!(registry.snapshot().len(), 1);
    }

    #[test]
    fn test_apply_arrangement_rejects_empty_list() {
        let registry = ScreenRegistry::new();

        let result = apply_arrangement(&registry, &[]);

        assert_eq!(result, Err(LayoutError::Empty));
        assert!(registry.snapshot().is_empty());
    }

    // ── ArrangementWatcher ────────────────────────────────────────────────────

    #[test]
    fn test_first_poll_always_rebuilds() {
        // Arrange
        let registry = Arc::new(ScreenRegistry::new());
        let enumerator = Arc::new(MockScreenEnumerator::mixed_pair());
        let mut watcher = ArrangementWatcher::new(Arc::clone(&registry), enumerator);

        // Act
        let rebuilt = watcher.poll_once().expect("poll");

        // Assert
        assert_eq!(rebuilt, Some(1));
        assert_eq!(registry.snapshot().len(), 2);
    }

    #[test]
    fn test_poll_without_change_does_not_rebuild() {
        let registry = Arc::new(ScreenRegistry::new());
        let enumerator = Arc::new(MockScreenEnumerator::single_1080p());
        let mut watcher = ArrangementWatcher::new(Arc::clone(&registry), enumerator);
        watcher.poll_once().expect("first poll");

        let rebuilt = watcher.poll_once().expect("second poll");

        assert_eq!(rebuilt, None);
        assert_eq!(registry.snapshot().version(), 1);
    }

    #[test]
    fn test_poll_after_monitor_added_rebuilds() {
        // Arrange
        let registry = Arc::new(ScreenRegistry::new());
        let enumerator = Arc::new(MockScreenEnumerator::single_1080p());
        let mut watcher = ArrangementWatcher::new(Arc::clone(&registry), enumerator.clone());
        watcher.poll_once().expect("first poll");

        // Act
        enumerator.set_monitors(vec![
            monitor(0, 0, 1920, 1080, true),
            monitor(1920, 0, 3840, 1080, false),
        ]);
        let rebuilt = watcher.poll_once().expect("second poll");

        // Assert
        assert_eq!(rebuilt, Some(2));
        assert_eq!(registry.snapshot().len(), 2);
    }

    #[test]
    fn test_rejected_list_is_reported_once_then_ignored() {
        // Arrange
        let registry = Arc::new(ScreenRegistry::new());
        let enumerator = Arc::new(MockScreenEnumerator::single_1080p());
        let mut watcher = ArrangementWatcher::new(Arc::clone(&registry), enumerator.clone());
        watcher.poll_once().expect("first poll");
        enumerator.set_monitors(Vec::new());

        // Act
        let first = watcher.poll_once();
        let second = watcher.poll_once();

        // Assert
        assert!(matches!(first, Err(ArrangementError::Layout(LayoutError::Empty))));
        assert!(matches!(second, Ok(None)));
        assert_eq!(registry.snapshot().len(), 1);
    }
}
