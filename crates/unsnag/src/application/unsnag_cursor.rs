//! UnsnagService: runs the jump decision for every pointer-move sample.
//!
//! This use case is the heart of the daemon.  The input hook hands it the raw
//! mouse position of each move; the service reads the OS cursor through a
//! [`CursorPort`], runs one engine step against the current screen snapshot,
//! and moves the cursor when the engine says it is stuck.
//!
//! # Architecture
//!
//! The service depends only on the [`CursorPort`] trait and on core domain
//! types.  The Windows hook injects a port backed by `GetCursorPos` and
//! `SetCursorPos`; tests inject a mock.  The engine state is owned here, so
//! whichever thread owns the service owns the state and no lock is taken on
//! the hot path apart from the brief snapshot clone.

use std::sync::Arc;

use tracing::{debug, trace, warn};
use unsnag_core::{EngineState, Outcome, Point, ScreenRegistry};

use super::control::ControlHandle;

/// Read and write access to the OS cursor.
#[cfg_attr(test, mockall::automock)]
pub trait CursorPort {
    /// Current cursor position, or `None` when the OS query fails.
    fn cursor_pos(&self) -> Option<Point>;

    /// Moves the cursor.  Returns `false` when the OS rejected the move.
    fn set_cursor_pos(&self, position: Point) -> bool;
}

/// Owns the engine state and feeds it pointer samples.
#[derive(Debug)]
pub struct UnsnagService {
    state: EngineState,
    registry: Arc<ScreenRegistry>,
    control: ControlHandle,
}

impl UnsnagService {
    pub fn new(registry: Arc<ScreenRegistry>, control: ControlHandle) -> Self {
        Self {
            state: EngineState::new(control.wrap_enabled()),
            registry,
            control,
        }
    }

    /// Runs one engine step for `(raw, cursor)` on the current snapshot.
    ///
    /// Returns the position the cursor should move to, or `None` to let the
    /// OS handle the move.
    pub fn on_pointer_sample(&mut self, raw: Point, cursor: Point) -> Option<Point> {
        self.state.wrap_enabled = self.control.wrap_enabled();
        let screens = self.registry.snapshot();
        let report = self.state.on_sample(&screens, raw, cursor);

        trace!(
            %raw,
            %cursor,
            cursor_screen = ?report.cursor_screen,
            mouse_screen = ?report.mouse_screen,
            direction = %report.stuck_direction,
            outside = %report.outside_distance,
            version = screens.version(),
            jump = report.jump_count,
            jumped = report.jumped(),
            "pointer sample"
        );

        if let Outcome::Corrected { position, kind } = report.outcome {
            debug!(
                jump = report.jump_count,
                from = %cursor,
                to = %position,
                ?kind,
                "cursor unsnagged"
            );
        }

        report.corrected()
    }

    /// Handles one pointer move as a hook sees it.
    ///
    /// Returns `true` when the cursor was moved and the OS default handling
    /// must be suppressed so it does not undo the move.
    pub fn handle_move(&mut self, raw: Point, port: &dyn CursorPort) -> bool {
        let Some(cursor) = port.cursor_pos() else {
            return false;
        };
        let Some(target) = self.on_pointer_sample(raw, cursor) else {
            return false;
        };
        if port.set_cursor_pos(target) {
            true
        } else {
            warn!(%target, "failed to move cursor");
            false
        }
    }

    /// Number of corrections applied so far.
    pub fn jump_count(&self) -> u64 {
        self.state.jump_count
    }

    pub fn engine_state(&self) -> &EngineState {
        &self.state
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
