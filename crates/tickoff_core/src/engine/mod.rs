//! State engine: tagged actions, pure reducer and read-only selectors.
//!
//! # Responsibility
//! - Own every transition over `AppState`.
//! - Expose derived views for the presentation layer.
//!
//! # Invariants
//! - The reducer is total: unknown ids are silent no-ops, never errors.
//! - No I/O, clock reads or id generation happen inside the engine.

pub mod action;
pub mod reducer;
pub mod selectors;
