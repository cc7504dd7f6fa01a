//! Console commands for the running daemon.
//!
//! While `unsnag run` is in the foreground, the user can type a command and
//! press Enter:
//!
//! ```text
//! w, wrap        toggle wrap-around
//! wrap on|off    set wrap-around explicitly
//! s, status      log the current wrap setting
//! q, quit, exit  stop the daemon (same as Ctrl-C)
//! ```
//!
//! Commands act on the shared [`ControlHandle`], so the hook thread picks up
//! a wrap change on its very next pointer sample.
//!
//! Input is read on a plain OS thread rather than through `tokio::io::stdin`,
//! whose blocking read would hold up runtime shutdown until the user pressed
//! Enter.

use std::io::{self, BufRead};
use std::thread::JoinHandle;

use tracing::{info, warn};

use crate::application::control::ControlHandle;

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    ToggleWrap,
    SetWrap(bool),
    Status,
    Quit,
}

impl ConsoleCommand {
    /// Parses one input line.  Case and surrounding whitespace are ignored;
    /// returns `None` for blank or unknown input.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim().to_ascii_lowercase();
        let mut words = line.split_whitespace();
        let command = match (words.next()?, words.next()) {
            ("w" | "wrap", None) => Self::ToggleWrap,
            ("w" | "wrap", Some("on")) => Self::SetWrap(true),
            ("w" | "wrap", Some("off")) => Self::SetWrap(false),
            ("s" | "status", None) => Self::Status,
            ("q" | "quit" | "exit", None) => Self::Quit,
            _ => return None,
        };
        words.next().is_none().then_some(command)
    }

    /// Applies the command to `control`.
    pub fn apply(self, control: &ControlHandle) {
        match self {
            Self::ToggleWrap => {
                control.toggle_wrap();
            }
            Self::SetWrap(enabled) => control.set_wrap_enabled(enabled),
            Self::Status => info!(wrap = control.wrap_enabled(), "status"),
            Self::Quit => {
                info!("quit requested from console");
                control.request_shutdown();
            }
        }
    }
}

/// Reads commands from `reader` until end of input, a quit command, or a
/// shutdown requested elsewhere.
///
/// # Errors
///
/// Returns the underlying I/O error if reading fails.
pub fn run_console<R: BufRead>(reader: R, control: &ControlHandle) -> io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        match ConsoleCommand::parse(&line) {
            Some(command) => command.apply(control),
            None if line.trim().is_empty() => {}
            None => warn!(input = %line.trim(), "unknown command (try: wrap, wrap on, wrap off, status, quit)"),
        }
        if control.is_shutdown_requested() {
            break;
        }
    }
    Ok(())
}

/// Starts reading commands from standard input on a background thread.
///
/// The thread is detached in practice: it ends on end of input or a quit
/// command, and otherwise with the process.
///
/// # Errors
///
/// Returns an I/O error if the thread cannot be spawned.
pub fn spawn_stdin_console(control: ControlHandle) -> io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("unsnag-console".to_string())
        .spawn(move || {
            if let Err(e) = run_console(io::stdin().lock(), &control) {
                warn!(error = %e, "console input closed");
            }
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
