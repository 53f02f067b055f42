//! Engine action set.
//!
//! Wire form is adjacently tagged so hosts can post intents as JSON:
//! `{"type": "TOGGLE_TODO", "payload": "<todo id>"}`.

use crate::model::category::{Category, CategoryId};
use crate::model::state::Theme;
use crate::model::todo::{Todo, TodoId};
use serde::{Deserialize, Serialize};

/// One atomic state transition request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    AddCategory(Category),
    /// Removes the category and every todo it owns.
    DeleteCategory(CategoryId),
    /// Selects a category and leaves the archive view.
    ///
    /// An id that names no category is fully inert: neither the selection
    /// nor `show_archived` changes.
    SelectCategory(CategoryId),
    AddTodo(Todo),
    ToggleTodo(TodoId),
    DeleteTodo(TodoId),
    ArchiveTodo(TodoId),
    UnarchiveTodo(TodoId),
    ToggleArchiveView,
    RenameCategory {
        id: CategoryId,
        name: String,
    },
    UpdateCategory {
        id: CategoryId,
        name: String,
        color: String,
        icon: String,
    },
    EditTodo {
        id: TodoId,
        title: String,
    },
    /// `todo_ids` is the desired order of the category's open todos. A
    /// repeated id takes the position of its first occurrence.
    #[serde(rename_all = "camelCase")]
    ReorderTodos {
        category_id: CategoryId,
        todo_ids: Vec<TodoId>,
    },
    SetTheme(Theme),
}

impl Action {
    /// Stable action name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddCategory(_) => "add_category",
            Self::DeleteCategory(_) => "delete_category",
            Self::SelectCategory(_) => "select_category",
            Self::AddTodo(_) => "add_todo",
            Self::ToggleTodo(_) => "toggle_todo",
            Self::DeleteTodo(_) => "delete_todo",
            Self::ArchiveTodo(_) => "archive_todo",
            Self::UnarchiveTodo(_) => "unarchive_todo",
            Self::ToggleArchiveView => "toggle_archive_view",
            Self::RenameCategory { .. } => "rename_category",
            Self::UpdateCategory { .. } => "update_category",
            Self::EditTodo { .. } => "edit_todo",
            Self::ReorderTodos { .. } => "reorder_todos",
            Self::SetTheme(_) => "set_theme",
        }
    }
}
