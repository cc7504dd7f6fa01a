//! Pointer input feed for the daemon.
//!
//! On Windows, this installs a low-level mouse hook (`WH_MOUSE_LL`) on a
//! dedicated Win32 message loop thread.  That thread owns the
//! [`UnsnagService`] and runs the jump decision inline for every
//! `WM_MOUSEMOVE`, because the hook must decide before it returns whether
//! Windows should apply the move.
//!
//! # Windows-Specific Implementation
//!
//! The hook callback must complete within ~300ms or Windows will remove the
//! hook.  One engine step is a few comparisons over a handful of rectangles,
//! so the decision is made in the callback itself.
//!
//! # Testability
//!
//! The [`PointerHook`] trait lets tests install a [`mock::MockPointerHook`]
//! and inject synthetic moves without any OS hook.

use tracing::{info, warn};

use crate::application::unsnag_cursor::UnsnagService;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::WindowsPointerHook as NativePointerHook;

/// Error type for input capture operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to install mouse hook: {0}")]
    MouseHookInstallFailed(String),
    #[error("failed to release mouse hook: {0}")]
    MouseHookUninstallFailed(String),
    #[error("mouse hook is already installed")]
    AlreadyInstalled,
    #[error("mouse hook is not installed")]
    NotInstalled,
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// A source of pointer-move notifications that drives an [`UnsnagService`].
///
/// The production implementation uses a Windows hook; tests use
/// [`mock::MockPointerHook`].
pub trait PointerHook {
    /// Starts delivering pointer moves to `service`.
    fn install(&mut self, service: UnsnagService) -> Result<(), CaptureError>;
    /// Stops delivery and releases all OS resources.
    fn uninstall(&mut self) -> Result<(), CaptureError>;
    fn is_installed(&self) -> bool;
}

/// Keeps a [`PointerHook`] installed for as long as the guard lives.
///
/// Dropping the guard uninstalls the hook, so the hook is released on every
/// exit path of the scope that owns it.
pub struct HookGuard<H: PointerHook> {
    hook: H,
}

impl<H: PointerHook> HookGuard<H> {
    /// Installs `hook` with `service` and wraps it in a guard.
    ///
    /// # Errors
    ///
    /// Propagates the [`CaptureError`] from [`PointerHook::install`].
    pub fn install(mut hook: H, service: UnsnagService) -> Result<Self, CaptureError> {
        hook.install(service)?;
        Ok(Self { hook })
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }
}

impl<H: PointerHook> Drop for HookGuard<H> {
    fn drop(&mut self) {
        if !self.hook.is_installed() {
            return;
        }
        match self.hook.uninstall() {
            Ok(()) => info!("mouse hook released"),
            Err(e) => warn!(error = %e, "failed to release mouse hook"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
