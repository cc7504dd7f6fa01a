//! # unsnag-core
//!
//! Geometry, screen arrangement registry and jump-decision engine for Unsnag,
//! a tool that frees a mouse cursor stuck at the seam between monitors.
//!
//! This crate has zero dependencies on OS APIs.  The daemon crate (`unsnag`)
//! feeds it pointer samples from a low-level mouse hook and monitor
//! rectangles from the display API.
//!
//! # Architecture overview (for beginners)
//!
//! Windows lets monitors of different sizes sit next to each other at
//! different heights.  Where one monitor's edge has no neighbour directly
//! behind it, the OS pins the cursor against that edge even though another
//! monitor is reachable a few pixels up or down.  Unsnag watches every mouse
//! move and, when the cursor is pinned like that, moves it onto the monitor
//! the user was aiming for.
//!
//! - **`domain::geometry`** – Points, half-open rectangles and per-axis
//!   directions, with the distance and clamping helpers everything else uses.
//!
//! - **`domain::registry`** – The current set of monitor rectangles as an
//!   immutable snapshot, swapped atomically when the arrangement changes.
//!   Answers "which screen contains this point", "which screen lies in this
//!   direction" and "where does this point wrap to".
//!
//! - **`domain::engine`** – The per-sample decision: stuck or not, and if so
//!   where the cursor should go.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `unsnag_core::ScreenRegistry` instead of `unsnag_core::domain::registry::ScreenRegistry`.
pub use domain::engine::{EngineState, JumpKind, Outcome, SampleReport};
pub use domain::geometry::{direction, sign, Direction, Point, Rect};
pub use domain::registry::{LayoutError, Screen, ScreenId, ScreenRegistry, ScreenSet, ScreenSpec};
