//! Application layer use cases for the daemon.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules) and the infrastructure (OS hooks, display APIs,
//! storage).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "free the
//!   cursor when it snags on a monitor edge").
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the infrastructure can be swapped without changing this code.
//! - **Contain no direct OS calls**.
//!
//! # Sub-modules
//!
//! - **`unsnag_cursor`** – Runs the jump decision for each pointer move and
//!   applies the correction through a cursor port.  This runs on every mouse
//!   movement, so it stays allocation-light.
//!
//! - **`update_arrangement`** – Rebuilds the screen registry whenever the
//!   monitor arrangement changes.
//!
//! - **`control`** – The wrap toggle and shutdown flag shared across threads.

pub mod control;
pub mod unsnag_cursor;
pub mod update_arrangement;
