//! Domain model for categorized todos and view preferences.
//!
//! # Responsibility
//! - Define the canonical records owned by the state engine.
//! - Define the persisted snapshot shape (`AppState`).
//!
//! # Invariants
//! - Every todo belongs to exactly one existing category.
//! - `selected_category_id`, when set, points at an existing category.
//! - Derived flags (dark mode) are computed on read, never stored.

pub mod category;
pub mod state;
pub mod todo;
