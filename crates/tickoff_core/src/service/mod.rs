//! Action facade.
//!
//! # Responsibility
//! - Wrap engine dispatch behind named, typed operations.
//! - Compute derived values (ids, timestamps, order ranks) that need a read
//!   of the current state before dispatching.
//! - Drive the debounced snapshot writer after each transition.
//!
//! # Invariants
//! - The engine handle is constructed once and passed explicitly; there is
//!   no process-global state store.

pub mod app_service;
pub mod reorder;
