//! Application state snapshot.
//!
//! # Responsibility
//! - Define the full engine state, which doubles as the persisted snapshot.
//! - Define the theme preference and its derived dark-mode flag.
//!
//! # Invariants
//! - `theme` is the single source of truth; dark mode is derived.
//! - Wire shape is `{categories, todos, selectedCategoryId, showArchived, theme}`.

use crate::model::category::{default_categories, Category, DEFAULT_SELECTED_CATEGORY_ID};
use crate::model::todo::Todo;
use serde::{Deserialize, Serialize};

/// Color theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parses a host color-scheme signal (`light` or `dark`).
    pub fn from_preference(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Wire/storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Complete engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub categories: Vec<Category>,
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub selected_category_id: Option<String>,
    /// Archive view filter, orthogonal to selection.
    #[serde(default)]
    pub show_archived: bool,
    pub theme: Theme,
}

impl AppState {
    /// Fresh-install state: built-in categories, no todos.
    pub fn initial(theme: Theme) -> Self {
        Self {
            categories: default_categories(),
            todos: Vec::new(),
            selected_category_id: Some(DEFAULT_SELECTED_CATEGORY_ID.to_string()),
            show_archived: false,
            theme,
        }
    }

    /// Derived from `theme` on every read.
    pub fn is_dark_mode(&self) -> bool {
        self.theme.is_dark()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn todo(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn has_category(&self, id: &str) -> bool {
        self.category(id).is_some()
    }

    /// Currently selected category, if any.
    pub fn selected_category(&self) -> Option<&Category> {
        self.selected_category_id
            .as_deref()
            .and_then(|id| self.category(id))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::initial(Theme::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppState, Theme};

    #[test]
    fn initial_state_selects_personal() {
        let state = AppState::initial(Theme::Dark);
        assert_eq!(state.selected_category_id.as_deref(), Some("personal"));
        assert_eq!(state.selected_category().map(|c| c.name.as_str()), Some("Personal"));
        assert!(state.todos.is_empty());
        assert!(!state.show_archived);
        assert!(state.is_dark_mode());
    }

    #[test]
    fn theme_preference_parsing_is_strict_about_values() {
        assert_eq!(Theme::from_preference(" Dark "), Some(Theme::Dark));
        assert_eq!(Theme::from_preference("light"), Some(Theme::Light));
        assert_eq!(Theme::from_preference("sepia"), None);
        assert_eq!(Theme::Light.opposite(), Theme::Dark);
    }

    #[test]
    fn snapshot_uses_expected_wire_fields() {
        let json = serde_json::to_value(AppState::initial(Theme::Light))
            .expect("serialize should succeed");
        assert_eq!(json["selectedCategoryId"], "personal");
        assert_eq!(json["showArchived"], false);
        assert_eq!(json["theme"], "light");
        assert!(json["categories"].is_array());
        assert!(json["todos"].is_array());
        assert!(json.get("isDarkMode").is_none());
    }
}
