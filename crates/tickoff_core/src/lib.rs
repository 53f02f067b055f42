//! Core state engine for TickOff, a local categorized todo list.
//! This crate is the single source of truth for todo/category invariants.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::EngineConfig;
pub use engine::action::Action;
pub use engine::reducer::reduce;
pub use engine::selectors::{
    category_counts, incomplete_order, next_order, visible_todos, CategoryCounts,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{default_categories, Category, CategoryId};
pub use model::state::{AppState, Theme};
pub use model::todo::{Todo, TodoId};
pub use service::app_service::{AppServiceError, AppServiceResult, TodoApp};
pub use service::reorder::{compute_reorder, InsertPosition};
pub use store::debounce::{DebouncedWriter, FlushOutcome};
pub use store::kv_store::{
    MemorySnapshotStore, SnapshotStore, SqliteSnapshotStore, StoreError, StoreResult,
};
pub use store::snapshot::{
    decode_snapshot, encode_state, load_snapshot, load_state, save_state, LoadReport, LoadSource,
    LoadedState, SnapshotError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
