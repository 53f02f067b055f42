//! Category domain model.
//!
//! # Responsibility
//! - Define the named/colored grouping that owns todos.
//! - Provide the built-in categories seeded on first launch.
//!
//! # Invariants
//! - `id` is stable for the category lifetime and never reused.
//! - `icon` is opaque to core; the presentation layer resolves it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a category.
///
/// Built-in categories use readable slugs (`personal`, `work`, ...), user
/// created ones use generated UUID text.
pub type CategoryId = String;

/// Named, colored, iconed grouping of todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// Non-empty display name.
    pub name: String,
    /// Color token, usually `#RRGGBB`.
    pub color: String,
    /// Icon identifier or emoji glyph.
    pub icon: String,
}

impl Category {
    /// Creates a category with a freshly generated stable ID.
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, color, icon)
    }

    /// Creates a category with a caller-provided ID.
    ///
    /// Used for built-ins and snapshot import where identity already exists.
    pub fn with_id(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        color: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            icon: icon.into(),
        }
    }
}

/// ID of the category selected on a fresh install.
pub const DEFAULT_SELECTED_CATEGORY_ID: &str = "personal";

/// Returns the four built-in categories in display order.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::with_id("personal", "Personal", "#FF2D55", "PencilIcon"),
        Category::with_id("work", "Work", "#007AFF", "ListChecksIcon"),
        Category::with_id("shopping", "Shopping", "#5AC8FA", "ClipboardListIcon"),
        Category::with_id("goals", "Goals", "#34C759", "BookmarkIcon"),
    ]
}
