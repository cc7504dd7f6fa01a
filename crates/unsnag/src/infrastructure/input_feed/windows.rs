//! Windows low-level mouse hook implementation.
//!
//! This module installs a `WH_MOUSE_LL` hook on a dedicated Win32 message
//! loop thread.  The thread owns the [`UnsnagService`] through a thread-local
//! slot, so the hook callback reaches it without any lock.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::cell::RefCell;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};
use unsnag_core::Point;
use windows::Win32::Foundation::{LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetCursorPos, GetMessageW, PeekMessageW,
    PostThreadMessageW, SetCursorPos, SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, MSG,
    MSLLHOOKSTRUCT, PM_NOREMOVE, WH_MOUSE_LL, WM_MOUSEMOVE, WM_QUIT, WM_USER,
};

use super::{CaptureError, PointerHook};
use crate::application::unsnag_cursor::{CursorPort, UnsnagService};

thread_local! {
    /// The service driven by the hook installed on this thread.
    static HOOK_SERVICE: RefCell<Option<UnsnagService>> = const { RefCell::new(None) };
}

/// The real OS cursor.
struct Win32Cursor;

impl CursorPort for Win32Cursor {
    fn cursor_pos(&self) -> Option<Point> {
        let mut pt = POINT::default();
        // SAFETY: `pt` is a valid, writable POINT.
        unsafe { GetCursorPos(&mut pt) }
            .ok()
            .map(|()| Point::new(pt.x, pt.y))
    }

    fn set_cursor_pos(&self, position: Point) -> bool {
        // SAFETY: SetCursorPos takes plain integers.
        unsafe { SetCursorPos(position.x, position.y) }.is_ok()
    }
}

/// Windows `WH_MOUSE_LL` hook running on its own message-loop thread.
#[derive(Debug, Default)]
pub struct WindowsPointerHook {
    /// Win32 id and join handle of the hook thread while installed.
    thread: Option<(u32, JoinHandle<()>)>,
}

impl WindowsPointerHook {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PointerHook for WindowsPointerHook {
    fn install(&mut self, service: UnsnagService) -> Result<(), CaptureError> {
        if self.thread.is_some() {
            return Err(CaptureError::AlreadyInstalled);
        }

        let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, String>>();
        let handle = thread::Builder::new()
            .name("unsnag-hook".to_string())
            .spawn(move || run_hook_message_loop(service, ready_tx))
            .map_err(|e| CaptureError::MouseHookInstallFailed(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(thread_id)) => {
                info!(thread_id, "mouse hook installed");
                self.thread = Some((thread_id, handle));
                Ok(())
            }
            Ok(Err(reason)) => {
                let _ = handle.join();
                Err(CaptureError::MouseHookInstallFailed(reason))
            }
            Err(_) => {
                let _ = handle.join();
                Err(CaptureError::MouseHookInstallFailed(
                    "hook thread exited before reporting".to_string(),
                ))
            }
        }
    }

    fn uninstall(&mut self) -> Result<(), CaptureError> {
        let (thread_id, handle) = self.thread.take().ok_or(CaptureError::NotInstalled)?;

        // SAFETY: posting a message to a thread id has no memory-safety
        // requirements; the loop thread created its queue before reporting.
        unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }
            .map_err(|e| CaptureError::MouseHookUninstallFailed(e.to_string()))?;

        handle
            .join()
            .map_err(|_| CaptureError::MouseHookUninstallFailed("hook thread panicked".to_string()))
    }

    fn is_installed(&self) -> bool {
        self.thread.is_some()
    }
}

/// Entry point for the dedicated Win32 message loop thread.
///
/// Reports the thread id (or the install error) through `ready`, then pumps
/// messages until `WM_QUIT`.
fn run_hook_message_loop(service: UnsnagService, ready: mpsc::Sender<Result<u32, String>>) {
    HOOK_SERVICE.with(|slot| *slot.borrow_mut() = Some(service));

    // SAFETY: the hook procedure has the HOOKPROC signature; a low-level hook
    // needs no module handle and is serviced by this thread's message loop.
    let hook = match unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), None, 0) } {
        Ok(hook) => hook,
        Err(e) => {
            HOOK_SERVICE.with(|slot| slot.borrow_mut().take());
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    let mut msg = MSG::default();
    // SAFETY: forces creation of this thread's message queue so that
    // PostThreadMessageW from `uninstall` cannot miss it.
    unsafe {
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
    }
    // SAFETY: no preconditions.
    let _ = ready.send(Ok(unsafe { GetCurrentThreadId() }));

    // Win32 message loop: GetMessageW returns 0 on WM_QUIT and -1 on error.
    // SAFETY: standard GetMessage/DispatchMessage loop.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
            DispatchMessageW(&msg);
        }
    }

    // SAFETY: `hook` was returned by SetWindowsHookExW on this thread.
    if let Err(e) = unsafe { UnhookWindowsHookEx(hook) } {
        warn!(error = %e, "UnhookWindowsHookEx failed");
    }
    let jumps = HOOK_SERVICE.with(|slot| slot.borrow_mut().take().map(|s| s.jump_count()));
    debug!(?jumps, "hook loop exited");
}

/// Low-level mouse hook callback.
///
/// # Safety
///
/// Called by Windows from the hook message loop thread; must return quickly.
unsafe extern "system" fn mouse_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code == HC_ACTION as i32 && w_param.0 as u32 == WM_MOUSEMOVE {
        // SAFETY: l_param points to a MSLLHOOKSTRUCT when n_code == HC_ACTION.
        let mhs = &*(l_param.0 as *const MSLLHOOKSTRUCT);
        let raw = Point::new(mhs.pt.x, mhs.pt.y);

        // A nested call would find the slot borrowed; let that move through.
        let suppress = HOOK_SERVICE.with(|slot| match slot.try_borrow_mut() {
            Ok(mut slot) => slot
                .as_mut()
                .is_some_and(|service| service.handle_move(raw, &Win32Cursor)),
            Err(_) => false,
        });

        if suppress {
            // Swallow the move so Windows does not undo our SetCursorPos.
            return LRESULT(1);
        }
    }

    // SAFETY: Forward to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}
