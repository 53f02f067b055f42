//! Read-only projections over `AppState`.
//!
//! Selectors never mutate state; the facade calls them to compute derived
//! values before dispatching, the presentation layer calls them to render.

use crate::model::state::AppState;
use crate::model::todo::{Todo, TodoId};

/// Per-category counters for sidebar badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    /// Todos shown in the main list (not archived).
    pub active: usize,
    pub archived: usize,
}

/// Todos rendered for the current selection and archive filter.
///
/// Open todos come first in manual `order` (newest first on ties), completed
/// todos follow newest first.
pub fn visible_todos(state: &AppState) -> Vec<&Todo> {
    let Some(selected) = state.selected_category_id.as_deref() else {
        return Vec::new();
    };

    let mut todos: Vec<&Todo> = state
        .todos
        .iter()
        .filter(|todo| todo.category_id == selected && todo.archived == state.show_archived)
        .collect();

    todos.sort_by(|a, b| {
        a.completed.cmp(&b.completed).then_with(|| {
            if a.completed {
                b.created_at.cmp(&a.created_at)
            } else {
                a.order
                    .cmp(&b.order)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }
        })
    });
    todos
}

/// IDs of a category's incomplete, unarchived todos in current manual order.
///
/// Ties on `order` keep array (insertion) order.
pub fn incomplete_order(state: &AppState, category_id: &str) -> Vec<TodoId> {
    let mut open: Vec<&Todo> = state
        .todos
        .iter()
        .filter(|todo| todo.category_id == category_id && todo.is_open())
        .collect();
    open.sort_by_key(|todo| todo.order);
    open.into_iter().map(|todo| todo.id.clone()).collect()
}

/// Rank for a todo appended to `category_id`: one past the current maximum
/// among incomplete todos, or `0` when there are none.
pub fn next_order(state: &AppState, category_id: &str) -> i64 {
    state
        .todos
        .iter()
        .filter(|todo| todo.category_id == category_id && !todo.completed)
        .map(|todo| todo.order)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

pub fn category_counts(state: &AppState, category_id: &str) -> CategoryCounts {
    state
        .todos
        .iter()
        .filter(|todo| todo.category_id == category_id)
        .fold(CategoryCounts::default(), |mut counts, todo| {
            if todo.archived {
                counts.archived += 1;
            } else {
                counts.active += 1;
            }
            counts
        })
}
