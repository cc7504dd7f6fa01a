//! Runtime control surface: the wrap toggle and the shutdown request.
//!
//! A [`ControlHandle`] is shared between the hook thread (which reads the wrap
//! flag on every pointer sample), the async runtime (which requests shutdown
//! on Ctrl-C) and anything else that wants to flip wrapping at runtime.
//! Cloning is cheap: every clone points at the same pair of atomics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

#[derive(Debug, Default)]
struct ControlFlags {
    wrap_enabled: AtomicBool,
    shutdown_requested: AtomicBool,
}

/// Cloneable handle to the daemon's runtime flags.
#[derive(Debug, Clone, Default)]
pub struct ControlHandle {
    flags: Arc<ControlFlags>,
}

impl ControlHandle {
    /// Creates a handle with wrapping set to `wrap_enabled` and no shutdown
    /// pending.
    pub fn new(wrap_enabled: bool) -> Self {
        let handle = Self::default();
        handle.flags.wrap_enabled.store(wrap_enabled, Ordering::Relaxed);
        handle
    }

    pub fn wrap_enabled(&self) -> bool {
        self.flags.wrap_enabled.load(Ordering::Relaxed)
    }

    pub fn set_wrap_enabled(&self, enabled: bool) {
        self.flags.wrap_enabled.store(enabled, Ordering::Relaxed);
        info!(enabled, "wrap-around updated");
    }

    /// Flips wrapping and returns the new value.
    pub fn toggle_wrap(&self) -> bool {
        let enabled = !self.flags.wrap_enabled.fetch_xor(true, Ordering::Relaxed);
        info!(enabled, "wrap-around toggled");
        enabled
    }

    /// Asks every loop holding this handle to wind down.  Idempotent.
    pub fn request_shutdown(&self) {
        self.flags.shutdown_requested.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.flags.shutdown_requested.load(Ordering::SeqCst)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
