//! The long-running daemon loop, independent of any particular OS hook.
//!
//! [`run`] wires the pieces together in the order the daemon needs them:
//!
//! ```text
//! run()
//!  └─ ArrangementWatcher::poll_once()   -- initial screen arrangement
//!  └─ HookGuard::install()              -- pointer moves start flowing
//!  └─ loop until shutdown requested
//!       └─ ArrangementWatcher::poll_once()  -- every poll interval
//!  └─ HookGuard dropped                 -- hook released
//! ```
//!
//! The binary passes the Windows hook and enumerator; tests pass mocks.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use unsnag_core::ScreenRegistry;

use crate::application::control::ControlHandle;
use crate::application::unsnag_cursor::UnsnagService;
use crate::application::update_arrangement::{ArrangementError, ArrangementWatcher};
use crate::infrastructure::input_feed::{CaptureError, HookGuard, PointerHook};
use crate::infrastructure::screen_info::PlatformScreenEnumerator;

/// Error type for daemon start-up.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("initial screen arrangement failed: {0}")]
    Arrangement(#[from] ArrangementError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Runs the daemon until `control` requests shutdown.
///
/// The hook is installed only after the first arrangement is in the
/// registry, and released before this returns.
///
/// # Errors
///
/// Returns [`DaemonError`] when the initial arrangement cannot be applied or
/// the hook cannot be installed.  Later arrangement failures are logged and
/// the previous arrangement stays in effect.
pub async fn run<H: PointerHook>(
    hook: H,
    enumerator: Arc<dyn PlatformScreenEnumerator>,
    control: ControlHandle,
    poll_interval: Duration,
) -> Result<(), DaemonError> {
    let registry = Arc::new(ScreenRegistry::new());
    let mut watcher = ArrangementWatcher::new(Arc::clone(&registry), enumerator);
    watcher.poll_once()?;

    let service = UnsnagService::new(Arc::clone(&registry), control.clone());
    let guard = HookGuard::install(hook, service)?;
    info!(wrap = control.wrap_enabled(), "unsnag running");

    let mut ticker = tokio::time::interval(poll_interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    while !control.is_shutdown_requested() {
        ticker.tick().await;
        match watcher.poll_once() {
            Ok(_) => {}
            // Already logged by apply_arrangement.
            Err(ArrangementError::Layout(_)) => {}
            Err(e) => warn!(error = %e, "screen arrangement refresh failed"),
        }
    }

    drop(guard);
    info!("unsnag stopped");
    Ok(())
}
