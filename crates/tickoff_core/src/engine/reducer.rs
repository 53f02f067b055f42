//! Pure reducer over `Action`.
//!
//! # Invariants
//! - `reduce` never panics and never fails.
//! - Actions naming a missing id leave the state unchanged.
//! - Deleting a category cascades to its todos and repairs the selection.
//! - Selecting an existing category always leaves the archive view.

use crate::engine::action::Action;
use crate::model::state::AppState;
use crate::model::todo::Todo;
use std::collections::HashMap;

/// Returns the state produced by applying `action` to `state`.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();
    apply(&mut next, action);
    next
}

/// Applies `action` to `state` in place.
pub fn apply(state: &mut AppState, action: Action) {
    match action {
        Action::AddCategory(category) => state.categories.push(category),
        Action::DeleteCategory(id) => delete_category(state, &id),
        Action::SelectCategory(id) => {
            if state.has_category(&id) {
                state.selected_category_id = Some(id);
                state.show_archived = false;
            }
        }
        Action::AddTodo(todo) => state.todos.push(todo),
        Action::ToggleTodo(id) => update_todo(state, &id, |todo| todo.completed = !todo.completed),
        Action::DeleteTodo(id) => state.todos.retain(|todo| todo.id != id),
        Action::ArchiveTodo(id) => update_todo(state, &id, |todo| todo.archived = true),
        Action::UnarchiveTodo(id) => update_todo(state, &id, |todo| todo.archived = false),
        Action::ToggleArchiveView => state.show_archived = !state.show_archived,
        Action::RenameCategory { id, name } => {
            if let Some(category) = state.categories.iter_mut().find(|c| c.id == id) {
                category.name = name;
            }
        }
        Action::UpdateCategory {
            id,
            name,
            color,
            icon,
        } => {
            if let Some(category) = state.categories.iter_mut().find(|c| c.id == id) {
                category.name = name;
                category.color = color;
                category.icon = icon;
            }
        }
        Action::EditTodo { id, title } => update_todo(state, &id, |todo| todo.title = title),
        Action::ReorderTodos {
            category_id,
            todo_ids,
        } => reorder_todos(state, &category_id, &todo_ids),
        Action::SetTheme(theme) => state.theme = theme,
    }
}

fn update_todo(state: &mut AppState, id: &str, mutate: impl FnOnce(&mut Todo)) {
    if let Some(todo) = state.todos.iter_mut().find(|todo| todo.id == id) {
        mutate(todo);
    }
}

fn delete_category(state: &mut AppState, id: &str) {
    state.categories.retain(|category| category.id != id);
    state.todos.retain(|todo| todo.category_id != id);

    if state.selected_category_id.as_deref() == Some(id) {
        state.selected_category_id = state.categories.first().map(|category| category.id.clone());
    }
}

fn reorder_todos(state: &mut AppState, category_id: &str, todo_ids: &[String]) {
    // First occurrence wins when an id is listed twice.
    let mut positions: HashMap<&str, i64> = HashMap::with_capacity(todo_ids.len());
    for (index, id) in todo_ids.iter().enumerate() {
        positions.entry(id.as_str()).or_insert(index as i64);
    }

    for todo in state
        .todos
        .iter_mut()
        .filter(|todo| todo.category_id == category_id)
    {
        if let Some(position) = positions.get(todo.id.as_str()) {
            todo.order = *position;
        }
    }
}
