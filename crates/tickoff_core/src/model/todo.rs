//! Todo domain model.
//!
//! # Responsibility
//! - Define the single task record owned by a category.
//! - Provide lifecycle helpers shared by reducer and selectors.
//!
//! # Invariants
//! - `category_id` always references a live category.
//! - `order` ranks incomplete, unarchived todos within one category; gaps are
//!   allowed, only relative order matters.

use crate::model::category::CategoryId;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a todo.
pub type TodoId = String;

/// Single task item belonging to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    /// Non-empty task text.
    pub title: String,
    pub completed: bool,
    /// Serialized as `categoryId`.
    pub category_id: CategoryId,
    /// Hidden from the main list, shown in the archive view.
    pub archived: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Manual drag rank among incomplete, unarchived siblings.
    pub order: i64,
}

impl Todo {
    /// Creates an open todo with generated ID and current timestamp.
    pub fn new(title: impl Into<String>, category_id: impl Into<CategoryId>, order: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
            category_id: category_id.into(),
            archived: false,
            created_at: now_epoch_ms(),
            order,
        }
    }

    /// Returns whether this todo takes part in manual ordering.
    pub fn is_open(&self) -> bool {
        !self.completed && !self.archived
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Falls back to `0` if the system clock is set before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
