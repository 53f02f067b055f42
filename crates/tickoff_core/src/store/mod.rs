//! Snapshot persistence adapter.
//!
//! # Responsibility
//! - Read/write the serialized `AppState` under a single key.
//! - Migrate and repair legacy snapshots on load.
//! - Coalesce bursts of state changes into one debounced write.
//!
//! # Invariants
//! - Loading never fails; unusable snapshots fall back to the initial state.
//! - Write failures are logged and swallowed; in-memory state stays correct.

pub mod debounce;
pub mod kv_store;
pub mod snapshot;
