//! Jump decision engine: detects a cursor pinned against a screen edge and
//! computes where it should go instead.
//!
//! # How "stuck" is detected (for beginners)
//!
//! The OS reports two positions for every pointer move: the *raw* sample the
//! mouse produced (which may lie beyond every monitor) and the *cursor*
//! position after the OS clamped it onto a screen.  When the user pushes
//! against an edge with no monitor directly behind it, the raw sample keeps
//! changing while the clamped cursor stays on the old screen.  The engine
//! compares the cursor with the previous raw sample: if they differ and the
//! raw sample's screen is not the cursor's screen, the cursor is stuck.
//!
//! A stuck cursor is then, in order of preference:
//!
//! 1. moved straight to the raw sample, when wrapping is on and that sample is
//!    already on another monitor;
//! 2. snapped onto the nearest monitor in the push direction;
//! 3. wrapped to the opposite horizontal edge of the desktop, when wrapping is
//!    on;
//! 4. left alone.
//!
//! The engine is pure apart from its [`EngineState`]: no I/O, no locking, no
//! allocation.  It runs once per pointer-move notification on the input
//! thread.

use super::geometry::{Direction, Point};
use super::registry::{ScreenId, ScreenSet};

/// How a corrected position was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// The raw sample already lies on another screen; trusted as-is.
    Direct,
    /// Snapped onto the nearest screen in the push direction.
    Snap { to: ScreenId },
    /// Wrapped to the opposite horizontal edge of the virtual desktop.
    Wrap,
}

/// Result of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Let the OS handle the move normally.
    PassThrough,
    /// Move the cursor to `position` and suppress the OS handling.
    Corrected { position: Point, kind: JumpKind },
}

/// Per-sample diagnostic record.
///
/// Advisory only: callers log it, nothing reads it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleReport {
    pub raw: Point,
    pub cursor: Point,
    pub cursor_screen: Option<ScreenId>,
    pub mouse_screen: Option<ScreenId>,
    /// Direction the raw sample lies outside the cursor's screen.
    pub stuck_direction: Direction,
    /// Signed distance from the cursor's screen to the raw sample.
    pub outside_distance: Point,
    /// Jump counter after this sample.
    pub jump_count: u64,
    pub outcome: Outcome,
}

impl SampleReport {
    /// The position to apply to the OS cursor, if any.
    pub fn corrected(&self) -> Option<Point> {
        match self.outcome {
            Outcome::Corrected { position, .. } => Some(position),
            Outcome::PassThrough => None,
        }
    }

    pub fn jumped(&self) -> bool {
        self.corrected().is_some()
    }
}

/// Persistent engine state, mutated once per sample.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineState {
    /// Previous raw pointer sample.  Starts at the origin.
    pub last_raw: Point,
    /// Number of corrections applied so far.
    pub jump_count: u64,
    /// Whether wrap-around to the opposite desktop edge is allowed.
    pub wrap_enabled: bool,
}

impl EngineState {
    pub fn new(wrap_enabled: bool) -> Self {
        Self {
            wrap_enabled,
            ..Self::default()
        }
    }

    /// Processes one `(raw, cursor)` sample against `screens`.
    ///
    /// `last_raw` is always updated to `raw`, whatever the outcome.
    pub fn on_sample(&mut self, screens: &ScreenSet, raw: Point, cursor: Point) -> SampleReport {
        let cursor_screen = screens.which_screen(cursor);
        let mouse_screen = screens.which_screen(raw);
        let cursor_id = cursor_screen.map(|s| s.id);
        let mouse_id = mouse_screen.map(|s| s.id);

        let stuck = cursor != self.last_raw && mouse_id != cursor_id;
        self.last_raw = raw;

        let (stuck_direction, outside_distance) = match cursor_screen {
            Some(screen) => (
                screen.bounds.outside_direction(raw),
                screen.bounds.outside_distance(raw),
            ),
            None => (Direction::NONE, Point::ORIGIN),
        };

        let outcome = match cursor_screen {
            Some(from) if stuck => {
                if self.wrap_enabled && mouse_screen.is_some() {
                    Outcome::Corrected {
                        position: raw,
                        kind: JumpKind::Direct,
                    }
                } else if let Some(to) = screens.screen_in_direction(stuck_direction, &from.bounds) {
                    Outcome::Corrected {
                        position: to.bounds.closest_boundary_point(cursor),
                        kind: JumpKind::Snap { to: to.id },
                    }
                } else if self.wrap_enabled && stuck_direction.x() != 0 {
                    Outcome::Corrected {
                        position: screens.wrap_point(stuck_direction, cursor),
                        kind: JumpKind::Wrap,
                    }
                } else {
                    Outcome::PassThrough
                }
            }
            // Not stuck, or no cursor screen to measure an edge from.
            _ => Outcome::PassThrough,
        };

        if matches!(outcome, Outcome::Corrected { .. }) {
            self.jump_count += 1;
        }

        SampleReport {
            raw,
            cursor,
            cursor_screen: cursor_id,
            mouse_screen: mouse_id,
            stuck_direction,
            outside_distance,
            jump_count: self.jump_count,
            outcome,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
