//! Domain entities for Unsnag.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code:
//!
//! - Contains the core rules of the application.
//! - Has **no** imports from OS APIs, UI frameworks or input hooks.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Here that means the whole jump decision can be exercised with synthetic
//! `(raw, cursor)` samples and hand-written monitor rectangles.

/// Points, rectangles and directions.
pub mod geometry;

/// Monitor arrangement snapshots and the registry that swaps them.
pub mod registry;

/// The per-sample stuck-cursor decision.
pub mod engine;
