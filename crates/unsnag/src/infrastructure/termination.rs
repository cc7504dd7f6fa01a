//! Termination signals that stop the daemon.
//!
//! On Windows every console control event counts: Ctrl-C, Ctrl-Break,
//! closing the console window, user logoff and system shutdown.  For the
//! last three Windows waits for the handler while the daemon unwinds, so the
//! mouse hook is released before the process goes away.  On Unix, SIGINT,
//! SIGTERM and SIGHUP do the same.

use std::fmt;
use std::future::Future;
use std::io;

use tracing::{info, warn};

use crate::application::control::ControlHandle;

/// The signal that ended the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    CtrlC,
    CtrlBreak,
    ConsoleClose,
    Logoff,
    SystemShutdown,
    Terminate,
    Hangup,
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CtrlC => "ctrl-c",
            Self::CtrlBreak => "ctrl-break",
            Self::ConsoleClose => "console close",
            Self::Logoff => "logoff",
            Self::SystemShutdown => "system shutdown",
            Self::Terminate => "terminate",
            Self::Hangup => "hangup",
        };
        f.write_str(name)
    }
}

/// Waits for `signal` and then requests shutdown through `control`.
///
/// If the signal listener itself fails, shutdown is not requested: the
/// daemon keeps running and can still be stopped from the console.
pub async fn shutdown_on<F>(signal: F, control: ControlHandle)
where
    F: Future<Output = io::Result<TerminationSignal>>,
{
    match signal.await {
        Ok(signal) => {
            info!(%signal, "shutdown signal received");
            control.request_shutdown();
        }
        Err(e) => warn!(error = %e, "cannot listen for termination signals"),
    }
}

/// Resolves on the first console control event.
///
/// # Errors
///
/// Returns an I/O error if a listener cannot be registered.
#[cfg(target_os = "windows")]
pub async fn wait_for_termination() -> io::Result<TerminationSignal> {
    use tokio::signal::windows::{ctrl_break, ctrl_c, ctrl_close, ctrl_logoff, ctrl_shutdown};

    let mut ctrl_c = ctrl_c()?;
    let mut ctrl_break = ctrl_break()?;
    let mut close = ctrl_close()?;
    let mut logoff = ctrl_logoff()?;
    let mut shutdown = ctrl_shutdown()?;

    let signal = tokio::select! {
        _ = ctrl_c.recv() => TerminationSignal::CtrlC,
        _ = ctrl_break.recv() => TerminationSignal::CtrlBreak,
        _ = close.recv() => TerminationSignal::ConsoleClose,
        _ = logoff.recv() => TerminationSignal::Logoff,
        _ = shutdown.recv() => TerminationSignal::SystemShutdown,
    };
    Ok(signal)
}

/// Resolves on the first of SIGINT, SIGTERM or SIGHUP.
///
/// # Errors
///
/// Returns an I/O error if a listener cannot be registered.
#[cfg(unix)]
pub async fn wait_for_termination() -> io::Result<TerminationSignal> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;

    let signal = tokio::select! {
        _ = interrupt.recv() => TerminationSignal::CtrlC,
        _ = terminate.recv() => TerminationSignal::Terminate,
        _ = hangup.recv() => TerminationSignal::Hangup,
    };
    Ok(signal)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_on_requests_shutdown_for_console_close() {
        // Arrange
        let control = ControlHandle::new(false);

        // Act
        shutdown_on(async { Ok(TerminationSignal::ConsoleClose) }, control.clone()).await;

        // Assert
        assert!(control.is_shutdown_requested());
    }

    #[tokio::test]
    async fn test_shutdown_on_leaves_daemon_running_when_listener_fails() {
        let control = ControlHandle::new(false);

        shutdown_on(
            async { Err(io::Error::new(io::ErrorKind::Other, "no console")) },
            control.clone(),
        )
        .await;

        assert!(!control.is_shutdown_requested());
    }

    #[test]
    fn test_signal_names_are_human_readable() {
        assert_eq!(TerminationSignal::CtrlBreak.to_string(), "ctrl-break");
        assert_eq!(TerminationSignal::SystemShutdown.to_string(), "system shutdown");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_wait_for_termination_registers_listeners() {
        // Registering must succeed; no signal arrives, so the wait times out.
        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(20), wait_for_termination())
                .await;
        assert!(waited.is_err());
    }
}
