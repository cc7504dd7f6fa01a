//! In-process stand-ins for the OS cursor and the mouse hook.
//!
//! [`MockCursor`] behaves like the OS cursor: it has a position, accepts
//! moves and records them.  [`MockPointerHook`] plays the hook thread: once
//! installed it owns the [`UnsnagService`] and routes injected moves through
//! it against its own `MockCursor`.  Both are cheap to clone and every clone
//! shares the same state, so a test can hand one clone away and keep
//! inspecting another.

use std::sync::Arc;

use parking_lot::Mutex;
use unsnag_core::Point;

use super::{CaptureError, PointerHook};
use crate::application::unsnag_cursor::{CursorPort, UnsnagService};

// ── MockCursor ────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct CursorState {
    position: Point,
    moves: Vec<Point>,
}

/// A fake OS cursor.
#[derive(Debug, Clone, Default)]
pub struct MockCursor {
    state: Arc<Mutex<CursorState>>,
}

impl MockCursor {
    pub fn new(position: Point) -> Self {
        let cursor = Self::default();
        cursor.place(position);
        cursor
    }

    /// Puts the cursor at `position` as the OS would, without recording a move.
    pub fn place(&self, position: Point) {
        self.state.lock().position = position;
    }

    pub fn position(&self) -> Point {
        self.state.lock().position
    }

    /// Every position set through [`CursorPort::set_cursor_pos`], in order.
    pub fn moves(&self) -> Vec<Point> {
        self.state.lock().moves.clone()
    }
}

impl CursorPort for MockCursor {
    fn cursor_pos(&self) -> Option<Point> {
        Some(self.position())
    }

    fn set_cursor_pos(&self, position: Point) -> bool {
        let mut state = self.state.lock();
        state.position = position;
        state.moves.push(position);
        true
    }
}

// ── MockPointerHook ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct HookState {
    service: Option<UnsnagService>,
    install_count: u32,
    uninstall_count: u32,
}

/// A fake mouse hook that drives its service from injected moves.
#[derive(Debug, Clone, Default)]
pub struct MockPointerHook {
    state: Arc<Mutex<HookState>>,
    cursor: MockCursor,
}

impl MockPointerHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cursor the hook reads and moves.
    pub fn cursor(&self) -> &MockCursor {
        &self.cursor
    }

    /// Delivers one pointer move with raw position `raw`, as the OS would.
    ///
    /// Returns `true` when the service corrected the cursor and the move
    /// would be suppressed; moves while uninstalled always pass through.
    pub fn inject_move(&self, raw: Point) -> bool {
        let mut state = self.state.lock();
        match state.service.as_mut() {
            Some(service) => service.handle_move(raw, &self.cursor),
            None => false,
        }
    }

    /// Jump count of the installed service, if any.
    pub fn jump_count(&self) -> Option<u64> {
        self.state.lock().service.as_ref().map(UnsnagService::jump_count)
    }

    pub fn install_count(&self) -> u32 {
        self.state.lock().install_count
    }

    pub fn uninstall_count(&self) -> u32 {
        self.state.lock().uninstall_count
    }
}

impl PointerHook for MockPointerHook {
    fn install(&mut self, service: UnsnagService) -> Result<(), CaptureError> {
        let mut state = self.state.lock();
        if state.service.is_some() {
            return Err(CaptureError::AlreadyInstalled);
        }
        state.service = Some(service);
        state.install_count += 1;
        Ok(())
    }

    fn uninstall(&mut self) -> Result<(), CaptureError> {
        let mut state = self.state.lock();
        if state.service.take().is_none() {
            return Err(CaptureError::NotInstalled);
        }
        state.uninstall_count += 1;
        Ok(())
    }

    fn is_installed(&self) -> bool {
        self.state.lock().service.is_some()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
