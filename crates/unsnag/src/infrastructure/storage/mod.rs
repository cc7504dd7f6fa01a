//! Storage infrastructure: configuration file loading.
//!
//! This module provides a thin adapter between the application and the
//! file system.  The `config` sub-module handles:
//!
//! - Reading the TOML configuration file from the platform-appropriate directory.
//! - Providing sensible defaults when the file does not exist yet (first run).
//!
//! Nothing is ever written back; runtime changes such as toggling wrap last
//! only until the daemon exits.

pub mod config;
