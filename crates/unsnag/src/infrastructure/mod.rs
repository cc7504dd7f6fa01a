//! Infrastructure layer for the daemon.
//!
//! Contains OS-facing adapters: the mouse hook, monitor enumeration, process
//! setup, termination signals, console commands and configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `unsnag_core`, but MUST NOT be imported by the domain layer.

pub mod console;
pub mod input_feed;
pub mod process;
pub mod screen_info;
pub mod storage;
pub mod termination;
