//! Engine handle and named operations.
//!
//! # Responsibility
//! - Own the current `AppState` and its version counter.
//! - Validate user input and derive ids/timestamps/ranks before dispatch.
//! - Schedule a debounced snapshot write for every state change.
//!
//! # Invariants
//! - `version` increases by one on every dispatch that changes state, and
//!   only then; no-op dispatches schedule nothing.
//! - The last remaining category cannot be deleted through the facade.

use crate::config::EngineConfig;
use crate::engine::action::Action;
use crate::engine::reducer::reduce;
use crate::engine::selectors::{
    category_counts, incomplete_order, next_order, visible_todos, CategoryCounts,
};
use crate::model::category::{Category, CategoryId};
use crate::model::state::{AppState, Theme};
use crate::model::todo::{Todo, TodoId};
use crate::service::reorder::{compute_reorder, InsertPosition};
use crate::store::debounce::{DebouncedWriter, FlushOutcome};
use crate::store::kv_store::SnapshotStore;
use crate::store::snapshot::{load_snapshot, LoadReport};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Input rejected by a facade operation before reaching the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppServiceError {
    /// Todo title is empty after trimming.
    EmptyTitle,
    /// Category name is empty after trimming.
    EmptyCategoryName,
    /// Deleting this category would leave none.
    LastCategory(CategoryId),
}

impl Display for AppServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "todo title cannot be empty"),
            Self::EmptyCategoryName => write!(f, "category name cannot be empty"),
            Self::LastCategory(id) => write!(
                f,
                "cannot delete the last category `{id}`; create another category first"
            ),
        }
    }
}

impl Error for AppServiceError {}

pub type AppServiceResult<T> = Result<T, AppServiceError>;

/// Explicit engine handle: state accessor, dispatch and persistence hooks.
pub struct TodoApp<S: SnapshotStore> {
    state: AppState,
    version: u64,
    load_report: Option<LoadReport>,
    writer: DebouncedWriter<S>,
}

impl<S: SnapshotStore> TodoApp<S> {
    /// Loads the stored snapshot (or the initial state) and builds the handle.
    ///
    /// A fresh, recovered or migrated state is scheduled for writing right
    /// away so the store catches up with memory. `system_theme` is the host
    /// color-scheme query, consulted at most once.
    pub fn open(store: S, config: &EngineConfig, system_theme: impl FnOnce() -> Theme) -> Self {
        let loaded = load_snapshot(&store, &config.storage_key, system_theme);
        let mut app = Self::with_state(store, config, loaded.state);
        if loaded.report.needs_rewrite() {
            app.writer.schedule_at(&app.state, app.version, Instant::now());
        }
        app.load_report = Some(loaded.report);
        app
    }

    /// Builds a handle over an explicit state without reading the store.
    pub fn with_state(store: S, config: &EngineConfig, state: AppState) -> Self {
        info!(
            "event=engine_start module=service status=ok categories={} todos={} theme={}",
            state.categories.len(),
            state.todos.len(),
            state.theme.as_str()
        );
        Self {
            state,
            version: 0,
            load_report: None,
            writer: DebouncedWriter::new(store, config.storage_key.clone(), config.persist_debounce),
        }
    }

    /// Read-only current state snapshot.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Number of state-changing dispatches since construction.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Diagnostics from `open`; `None` for `with_state` handles.
    pub fn load_report(&self) -> Option<LoadReport> {
        self.load_report
    }

    pub fn store(&self) -> &S {
        self.writer.store()
    }

    pub fn is_dark_mode(&self) -> bool {
        self.state.is_dark_mode()
    }

    pub fn visible_todos(&self) -> Vec<&Todo> {
        visible_todos(&self.state)
    }

    pub fn category_counts(&self, category_id: &str) -> CategoryCounts {
        category_counts(&self.state, category_id)
    }

    /// Applies one raw action. Returns whether the state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        self.dispatch_at(action, Instant::now())
    }

    /// `dispatch` with an explicit clock reading for the debounce timer.
    pub fn dispatch_at(&mut self, action: Action, now: Instant) -> bool {
        let name = action.name();
        let next = reduce(&self.state, action);
        if next == self.state {
            debug!("event=dispatch module=service action={name} status=noop");
            return false;
        }

        self.state = next;
        self.version += 1;
        self.writer.schedule_at(&self.state, self.version, now);
        debug!(
            "event=dispatch module=service action={name} status=ok version={}",
            self.version
        );
        true
    }

    /// Creates a category with a generated id and returns that id.
    pub fn add_category(
        &mut self,
        name: &str,
        color: &str,
        icon: &str,
    ) -> AppServiceResult<CategoryId> {
        let name = normalize_category_name(name)?;
        let category = Category::new(name, color, icon);
        let id = category.id.clone();
        self.dispatch(Action::AddCategory(category));
        Ok(id)
    }

    /// Deletes a category and its todos.
    ///
    /// # Errors
    /// - `LastCategory` when `id` is the only remaining category.
    pub fn delete_category(&mut self, id: &str) -> AppServiceResult<bool> {
        if self.state.categories.len() <= 1 && self.state.has_category(id) {
            return Err(AppServiceError::LastCategory(id.to_string()));
        }
        Ok(self.dispatch(Action::DeleteCategory(id.to_string())))
    }

    pub fn select_category(&mut self, id: &str) -> bool {
        self.dispatch(Action::SelectCategory(id.to_string()))
    }

    /// Appends a todo to the selected category, ranked after its open todos.
    ///
    /// Returns `Ok(None)` when no category is selected.
    pub fn add_todo(&mut self, title: &str) -> AppServiceResult<Option<TodoId>> {
        let title = normalize_title(title)?;
        let Some(category_id) = self.state.selected_category_id.clone() else {
            debug!("event=add_todo module=service status=noop reason=no_selection");
            return Ok(None);
        };

        let order = next_order(&self.state, &category_id);
        let todo = Todo::new(title, category_id, order);
        let id = todo.id.clone();
        self.dispatch(Action::AddTodo(todo));
        Ok(Some(id))
    }

    pub fn toggle_todo(&mut self, id: &str) -> bool {
        self.dispatch(Action::ToggleTodo(id.to_string()))
    }

    pub fn delete_todo(&mut self, id: &str) -> bool {
        self.dispatch(Action::DeleteTodo(id.to_string()))
    }

    pub fn archive_todo(&mut self, id: &str) -> bool {
        self.dispatch(Action::ArchiveTodo(id.to_string()))
    }

    pub fn unarchive_todo(&mut self, id: &str) -> bool {
        self.dispatch(Action::UnarchiveTodo(id.to_string()))
    }

    pub fn toggle_archive_view(&mut self) -> bool {
        self.dispatch(Action::ToggleArchiveView)
    }

    pub fn rename_category(&mut self, id: &str, name: &str) -> AppServiceResult<bool> {
        let name = normalize_category_name(name)?;
        Ok(self.dispatch(Action::RenameCategory {
            id: id.to_string(),
            name,
        }))
    }

    pub fn update_category(
        &mut self,
        id: &str,
        name: &str,
        color: &str,
        icon: &str,
    ) -> AppServiceResult<bool> {
        let name = normalize_category_name(name)?;
        Ok(self.dispatch(Action::UpdateCategory {
            id: id.to_string(),
            name,
            color: color.to_string(),
            icon: icon.to_string(),
        }))
    }

    pub fn edit_todo(&mut self, id: &str, title: &str) -> AppServiceResult<bool> {
        let title = normalize_title(title)?;
        Ok(self.dispatch(Action::EditTodo {
            id: id.to_string(),
            title,
        }))
    }

    /// Drops `dragged` above or below `target` among the category's open todos.
    ///
    /// Returns `false` without dispatching when the move is a no-op.
    pub fn reorder_todos(
        &mut self,
        category_id: &str,
        dragged: &str,
        target: &str,
        position: InsertPosition,
    ) -> bool {
        let current = incomplete_order(&self.state, category_id);
        let Some(todo_ids) = compute_reorder(&current, dragged, target, position) else {
            debug!("event=reorder module=service status=noop open_todos={}", current.len());
            return false;
        };
        self.dispatch(Action::ReorderTodos {
            category_id: category_id.to_string(),
            todo_ids,
        })
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        self.dispatch(Action::SetTheme(theme))
    }

    /// Switches to the opposite theme and returns the new one.
    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.state.theme.opposite();
        self.dispatch(Action::SetTheme(next));
        next
    }

    /// When the pending snapshot write becomes due, if one is pending.
    pub fn next_persist_deadline(&self) -> Option<Instant> {
        self.writer.next_deadline()
    }

    pub fn has_pending_write(&self) -> bool {
        self.writer.is_pending()
    }

    /// Event-loop hook: flushes the pending write once its quiet period ends.
    pub fn poll(&mut self, now: Instant) -> Option<FlushOutcome> {
        self.writer.flush_due(now)
    }

    /// Writes the pending snapshot immediately.
    pub fn flush(&mut self) -> Option<FlushOutcome> {
        self.writer.flush_now()
    }

    /// Teardown: cancels the pending write so nothing lands after unmount.
    ///
    /// Hosts that want the latest burst saved call `flush` first.
    pub fn shutdown(&mut self) -> bool {
        let cancelled = self.writer.cancel();
        info!(
            "event=engine_stop module=service status=ok version={} cancelled_write={cancelled}",
            self.version
        );
        cancelled
    }
}

fn normalize_title(value: &str) -> AppServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppServiceError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn normalize_category_name(value: &str) -> AppServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppServiceError::EmptyCategoryName);
    }
    Ok(trimmed.to_string())
}
