//! Snapshot decode, migration and encode.
//!
//! # Responsibility
//! - Turn the raw stored string into a valid `AppState`, or fall back.
//! - Apply legacy migrations (missing `order`) and invariant repairs.
//!
//! # Invariants
//! - A todo without `order` gets its index in the stored array.
//! - An entry that does not decode is skipped; the rest of the snapshot stays.
//! - The system theme is consulted only when the stored theme is not exactly
//!   `"light"` or `"dark"`, or when no usable snapshot exists.
//! - A snapshot that already satisfies every invariant round-trips unchanged.

use crate::model::category::Category;
use crate::model::state::{AppState, Theme};
use crate::model::todo::Todo;
use crate::store::kv_store::{SnapshotStore, StoreError, StoreResult};
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a stored snapshot could not be used.
#[derive(Debug)]
pub enum SnapshotError {
    /// Store read failed.
    Read(StoreError),
    /// Stored text is not JSON, or lacks the required `categories`/`todos`
    /// arrays.
    Malformed(serde_json::Error),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read snapshot: {err}"),
            Self::Malformed(err) => write!(f, "malformed snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Malformed(err) => Some(err),
        }
    }
}

/// Where the loaded state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Decoded from the stored snapshot.
    Stored,
    /// Nothing stored yet; initial state.
    Empty,
    /// Stored snapshot unusable; initial state substituted.
    Recovered,
}

/// Diagnostics about one snapshot load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub source: LoadSource,
    /// Todos that received their array index as `order`.
    pub migrated_orders: usize,
    /// Todos dropped because their category no longer exists.
    pub dropped_orphans: usize,
    /// Category or todo entries skipped because they did not decode.
    pub skipped_entries: usize,
    /// Selection pointed nowhere and was reset.
    pub selection_repaired: bool,
    /// Theme came from the host color-scheme preference.
    pub theme_from_system: bool,
}

impl LoadReport {
    /// Whether the loaded state differs from what the store holds.
    pub fn needs_rewrite(&self) -> bool {
        self.source != LoadSource::Stored
            || self.migrated_orders > 0
            || self.dropped_orphans > 0
            || self.skipped_entries > 0
            || self.selection_repaired
            || self.theme_from_system
    }

    fn fresh(source: LoadSource) -> Self {
        Self {
            source,
            migrated_orders: 0,
            dropped_orphans: 0,
            skipped_entries: 0,
            selection_repaired: false,
            theme_from_system: true,
        }
    }
}

/// Result of `load_snapshot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedState {
    pub state: AppState,
    pub report: LoadReport,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSnapshot {
    categories: Vec<Value>,
    todos: Vec<Value>,
    #[serde(default)]
    selected_category_id: Option<String>,
    #[serde(default)]
    show_archived: bool,
    #[serde(default)]
    theme: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTodo {
    id: String,
    title: String,
    #[serde(default)]
    completed: bool,
    category_id: String,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    order: Option<i64>,
}

/// A decoded snapshot whose theme may still need the system fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSnapshot {
    categories: Vec<Category>,
    todos: Vec<Todo>,
    selected_category_id: Option<String>,
    show_archived: bool,
    theme: Option<Theme>,
    migrated_orders: usize,
    dropped_orphans: usize,
    skipped_entries: usize,
    selection_repaired: bool,
}

impl DecodedSnapshot {
    /// Stored theme, `None` when the system preference must decide.
    pub fn stored_theme(&self) -> Option<Theme> {
        self.theme
    }

    /// Builds the final state, calling `system_theme` only when needed.
    pub fn resolve(self, system_theme: impl FnOnce() -> Theme) -> LoadedState {
        let (theme, theme_from_system) = match self.theme {
            Some(theme) => (theme, false),
            None => (system_theme(), true),
        };

        LoadedState {
            state: AppState {
                categories: self.categories,
                todos: self.todos,
                selected_category_id: self.selected_category_id,
                show_archived: self.show_archived,
                theme,
            },
            report: LoadReport {
                source: LoadSource::Stored,
                migrated_orders: self.migrated_orders,
                dropped_orphans: self.dropped_orphans,
                skipped_entries: self.skipped_entries,
                selection_repaired: self.selection_repaired,
                theme_from_system,
            },
        }
    }
}

/// Decodes and migrates one raw snapshot string.
///
/// # Errors
/// - `SnapshotError::Malformed` when the text is unusable.
pub fn decode_snapshot(raw: &str) -> Result<DecodedSnapshot, SnapshotError> {
    let stored: StoredSnapshot = serde_json::from_str(raw).map_err(SnapshotError::Malformed)?;

    let theme = match stored.theme.as_str() {
        Some("light") => Some(Theme::Light),
        Some("dark") => Some(Theme::Dark),
        _ => None,
    };

    let mut skipped_entries = 0;
    let mut categories = Vec::with_capacity(stored.categories.len());
    for (index, entry) in stored.categories.into_iter().enumerate() {
        match serde_json::from_value::<Category>(entry) {
            Ok(category) => categories.push(category),
            Err(err) => {
                skipped_entries += 1;
                warn!(
                    "event=snapshot_decode module=store status=skipped entry=category index={index} error={err}"
                );
            }
        }
    }

    let category_ids: HashSet<&str> = categories
        .iter()
        .map(|category| category.id.as_str())
        .collect();

    let mut migrated_orders = 0;
    let mut dropped_orphans = 0;
    let mut todos = Vec::with_capacity(stored.todos.len());
    for (index, entry) in stored.todos.into_iter().enumerate() {
        let todo = match serde_json::from_value::<StoredTodo>(entry) {
            Ok(todo) => todo,
            Err(err) => {
                skipped_entries += 1;
                warn!(
                    "event=snapshot_decode module=store status=skipped entry=todo index={index} error={err}"
                );
                continue;
            }
        };
        // Index is taken before orphans are dropped so legacy order survives.
        let order = todo.order.unwrap_or_else(|| {
            migrated_orders += 1;
            index as i64
        });
        if !category_ids.contains(todo.category_id.as_str()) {
            dropped_orphans += 1;
            continue;
        }
        todos.push(Todo {
            id: todo.id,
            title: todo.title,
            completed: todo.completed,
            category_id: todo.category_id,
            archived: todo.archived,
            created_at: todo.created_at,
            order,
        });
    }

    let selection_valid = match stored.selected_category_id.as_deref() {
        Some(id) => category_ids.contains(id),
        None => categories.is_empty(),
    };
    let (selected_category_id, selection_repaired) = if selection_valid {
        (stored.selected_category_id, false)
    } else {
        (
            categories.first().map(|category| category.id.clone()),
            true,
        )
    };

    Ok(DecodedSnapshot {
        categories,
        todos,
        selected_category_id,
        show_archived: stored.show_archived,
        theme,
        migrated_orders,
        dropped_orphans,
        skipped_entries,
        selection_repaired,
    })
}

/// Loads the state stored under `key`, falling back to the initial state.
///
/// `system_theme` is the host color-scheme query; it is called at most once.
pub fn load_snapshot<S>(store: &S, key: &str, system_theme: impl FnOnce() -> Theme) -> LoadedState
where
    S: SnapshotStore + ?Sized,
{
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("event=snapshot_load module=store status=empty");
            return fresh(LoadSource::Empty, system_theme);
        }
        Err(err) => {
            let err = SnapshotError::Read(err);
            warn!(
                "event=snapshot_load module=store status=error error_code=snapshot_read_failed error={err}"
            );
            return fresh(LoadSource::Recovered, system_theme);
        }
    };

    match decode_snapshot(&raw) {
        Ok(decoded) => {
            let loaded = decoded.resolve(system_theme);
            let report = loaded.report;
            info!(
                "event=snapshot_load module=store status=ok categories={} todos={} migrated_orders={} dropped_orphans={} skipped_entries={} selection_repaired={} theme_from_system={}",
                loaded.state.categories.len(),
                loaded.state.todos.len(),
                report.migrated_orders,
                report.dropped_orphans,
                report.skipped_entries,
                report.selection_repaired,
                report.theme_from_system
            );
            loaded
        }
        Err(err) => {
            warn!(
                "event=snapshot_load module=store status=error error_code=snapshot_malformed bytes={} error={err}",
                raw.len()
            );
            fresh(LoadSource::Recovered, system_theme)
        }
    }
}

/// Convenience wrapper over `load_snapshot` returning only the state.
pub fn load_state<S>(store: &S, key: &str, system_theme: impl FnOnce() -> Theme) -> AppState
where
    S: SnapshotStore + ?Sized,
{
    load_snapshot(store, key, system_theme).state
}

/// Serializes `state` to the stored JSON shape.
pub fn encode_state(state: &AppState) -> serde_json::Result<String> {
    serde_json::to_string(state)
}

/// Encodes and writes `state` immediately.
pub fn save_state<S>(store: &S, key: &str, state: &AppState) -> StoreResult<()>
where
    S: SnapshotStore + ?Sized,
{
    let payload = encode_state(state)?;
    store.write(key, &payload)
}

fn fresh(source: LoadSource, system_theme: impl FnOnce() -> Theme) -> LoadedState {
    LoadedState {
        state: AppState::initial(system_theme()),
        report: LoadReport::fresh(source),
    }
}

#[cfg(test)]
mod tests {
    use super::decode_snapshot;
    use crate::model::state::Theme;
    use serde_json::json;

    #[test]
    fn missing_order_uses_array_index() {
        let raw = json!({
            "categories": [{"id": "c", "name": "C", "color": "#fff", "icon": "PencilIcon"}],
            "todos": [
                {"id": "a", "title": "A", "completed": false, "categoryId": "c", "archived": false, "createdAt": 1},
                {"id": "b", "title": "B", "completed": false, "categoryId": "c", "archived": false, "createdAt": 2, "order": 9},
                {"id": "d", "title": "D", "completed": false, "categoryId": "c", "archived": false, "createdAt": 3, "order": null}
            ],
            "selectedCategoryId": "c",
            "showArchived": false,
            "theme": "dark"
        })
        .to_string();

        let decoded = decode_snapshot(&raw).expect("snapshot should decode");
        let loaded = decoded.resolve(|| Theme::Light);
        let orders: Vec<i64> = loaded.state.todos.iter().map(|todo| todo.order).collect();
        assert_eq!(orders, vec![0, 9, 2]);
        assert_eq!(loaded.report.migrated_orders, 2);
        assert_eq!(loaded.state.theme, Theme::Dark);
        assert!(!loaded.report.theme_from_system);
    }

    #[test]
    fn missing_required_arrays_is_malformed() {
        assert!(decode_snapshot(r#"{"todos": []}"#).is_err());
        assert!(decode_snapshot(r#"{"categories": {}, "todos": []}"#).is_err());
        assert!(decode_snapshot("not json").is_err());
    }

    #[test]
    fn theme_must_match_exactly() {
        let raw = json!({"categories": [], "todos": [], "theme": "Dark"}).to_string();
        let decoded = decode_snapshot(&raw).expect("snapshot should decode");
        assert_eq!(decoded.stored_theme(), None);
    }

    #[test]
    fn dangling_selection_and_orphans_are_repaired() {
        let raw = json!({
            "categories": [{"id": "c", "name": "C", "color": "#fff", "icon": "PencilIcon"}],
            "todos": [
                {"id": "gone", "title": "G", "categoryId": "deleted", "createdAt": 1}
            ],
            "selectedCategoryId": "deleted",
            "theme": "light"
        })
        .to_string();

        let loaded = decode_snapshot(&raw).expect("snapshot should decode").resolve(|| Theme::Dark);
        assert!(loaded.state.todos.is_empty());
        assert_eq!(loaded.report.dropped_orphans, 1);
        assert_eq!(loaded.state.selected_category_id.as_deref(), Some("c"));
        assert!(loaded.report.selection_repaired);
    }

    #[test]
    fn undecodable_entries_are_skipped() {
        let raw = json!({
            "categories": [
                {"id": "c", "name": "C", "color": "#fff", "icon": "PencilIcon"},
                {"id": "broken", "name": "No icon", "color": "#000"}
            ],
            "todos": [
                {"id": "a", "categoryId": "c", "createdAt": 1},
                {"id": "b", "title": "B", "categoryId": "c", "createdAt": 2}
            ],
            "selectedCategoryId": "c",
            "theme": "light"
        })
        .to_string();

        let loaded = decode_snapshot(&raw)
            .expect("entry errors should not reject the snapshot")
            .resolve(|| Theme::Dark);

        assert_eq!(loaded.report.skipped_entries, 2);
        assert!(loaded.report.needs_rewrite());
        let ids: Vec<&str> = loaded.state.categories.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
        assert_eq!(loaded.state.todos.len(), 1);
        assert_eq!(loaded.state.todos[0].id, "b");
        // Index counts the skipped entry.
        assert_eq!(loaded.state.todos[0].order, 1);
    }
}
