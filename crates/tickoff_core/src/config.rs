//! Engine configuration.
//!
//! Hosts build one `EngineConfig` at startup and pass it to `TodoApp::open`.

use std::time::Duration;

/// Storage key used by earlier releases; changing it orphans saved data.
pub const DEFAULT_STORAGE_KEY: &str = "todoAppState";
pub const DEFAULT_PERSIST_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Key under which the snapshot is stored.
    pub storage_key: String,
    /// Quiet period before a pending snapshot write flushes.
    pub persist_debounce: Duration,
}

impl EngineConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_persist_debounce(mut self, debounce: Duration) -> Self {
        self.persist_debounce = debounce;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            persist_debounce: DEFAULT_PERSIST_DEBOUNCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineConfig, DEFAULT_STORAGE_KEY};
    use std::time::Duration;

    #[test]
    fn builders_override_defaults() {
        let config = EngineConfig::default()
            .with_storage_key("other")
            .with_persist_debounce(Duration::ZERO);
        assert_eq!(config.storage_key, "other");
        assert_eq!(config.persist_debounce, Duration::ZERO);
        assert_eq!(EngineConfig::default().storage_key, DEFAULT_STORAGE_KEY);
    }
}
