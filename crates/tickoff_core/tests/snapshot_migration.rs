use serde_json::json;
use std::cell::Cell;
use tickoff_core::{
    encode_state, incomplete_order, load_snapshot, load_state, reduce, Action, AppState,
    EngineConfig, InsertPosition, LoadSource, MemorySnapshotStore, SnapshotStore, Theme, TodoApp,
};

const KEY: &str = "todoAppState";

fn legacy_snapshot() -> String {
    json!({
        "categories": [
            {"id": "personal", "name": "Personal", "color": "#FF2D55", "icon": "PencilIcon"},
            {"id": "work", "name": "Work", "color": "#007AFF", "icon": "ListChecksIcon"}
        ],
        "todos": [
            {"id": "t0", "title": "first", "completed": false, "categoryId": "personal", "archived": false, "createdAt": 1_700_000_000_000_i64},
            {"id": "t1", "title": "second", "completed": false, "categoryId": "work", "archived": false, "createdAt": 1_700_000_000_001_i64},
            {"id": "t2", "title": "third", "completed": false, "categoryId": "personal", "archived": false, "createdAt": 1_700_000_000_002_i64},
            {"id": "t3", "title": "fourth", "completed": false, "categoryId": "personal", "archived": false, "createdAt": 1_700_000_000_003_i64}
        ],
        "selectedCategoryId": "personal",
        "showArchived": false,
        "theme": "light"
    })
    .to_string()
}

#[test]
fn todos_without_order_get_their_array_index() {
    let store = MemorySnapshotStore::with_entry(KEY, legacy_snapshot());

    let loaded = load_snapshot(&store, KEY, || Theme::Dark);

    assert_eq!(loaded.report.source, LoadSource::Stored);
    assert_eq!(loaded.report.migrated_orders, 4);
    let orders: Vec<(&str, i64)> = loaded
        .state
        .todos
        .iter()
        .map(|todo| (todo.id.as_str(), todo.order))
        .collect();
    assert_eq!(orders, vec![("t0", 0), ("t1", 1), ("t2", 2), ("t3", 3)]);
}

#[test]
fn reorders_after_migration_produce_strict_order() {
    let store = MemorySnapshotStore::with_entry(KEY, legacy_snapshot());
    let mut app = TodoApp::open(&store, &EngineConfig::default(), || Theme::Light);

    assert!(app.reorder_todos("personal", "t3", "t0", InsertPosition::Above));

    assert_eq!(incomplete_order(app.state(), "personal"), vec!["t3", "t0", "t2"]);
    let mut orders: Vec<i64> = app
        .state()
        .todos
        .iter()
        .filter(|todo| todo.category_id == "personal")
        .map(|todo| todo.order)
        .collect();
    orders.sort_unstable();
    orders.dedup();
    assert_eq!(orders.len(), 3);
    // Other categories keep their migrated rank.
    assert_eq!(app.state().todo("t1").expect("todo should exist").order, 1);
}

#[test]
fn stored_theme_round_trips_without_system_fallback() {
    let state = reduce(&AppState::initial(Theme::Light), Action::SetTheme(Theme::Dark));
    let store = MemorySnapshotStore::with_entry(KEY, encode_state(&state).expect("encode should succeed"));
    let system_queried = Cell::new(false);

    let loaded = load_snapshot(&store, KEY, || {
        system_queried.set(true);
        Theme::Light
    });

    assert_eq!(loaded.state.theme, Theme::Dark);
    assert!(!loaded.report.theme_from_system);
    assert!(!system_queried.get());
    assert_eq!(loaded.state, state);
}

#[test]
fn invalid_theme_falls_back_to_system_preference() {
    for theme in [json!("blue"), json!(null), json!(1)] {
        let raw = json!({"categories": [], "todos": [], "selectedCategoryId": null, "theme": theme});
        let store = MemorySnapshotStore::with_entry(KEY, raw.to_string());

        let loaded = load_snapshot(&store, KEY, || Theme::Dark);

        assert_eq!(loaded.state.theme, Theme::Dark);
        assert!(loaded.report.theme_from_system);
    }
}

#[test]
fn malformed_snapshots_recover_to_initial_state() {
    for raw in [
        "{not json".to_string(),
        json!({"todos": []}).to_string(),
        json!({"categories": [], "todos": {"a": 1}}).to_string(),
    ] {
        let store = MemorySnapshotStore::with_entry(KEY, raw);

        let loaded = load_snapshot(&store, KEY, || Theme::Dark);

        assert_eq!(loaded.report.source, LoadSource::Recovered);
        assert_eq!(loaded.state, AppState::initial(Theme::Dark));
    }
}

#[test]
fn undecodable_entry_keeps_the_rest_of_the_snapshot() {
    let raw = json!({
        "categories": [
            {"id": "personal", "name": "Personal", "color": "#FF2D55", "icon": "PencilIcon"},
            {"id": "half"}
        ],
        "todos": [
            {"id": "t0", "title": "kept", "categoryId": "personal", "createdAt": 1, "order": 0},
            {"id": "t1", "categoryId": "personal", "createdAt": 2, "order": 1}
        ],
        "selectedCategoryId": "personal",
        "theme": "dark"
    })
    .to_string();
    let store = MemorySnapshotStore::with_entry(KEY, raw);

    let mut app = TodoApp::open(&store, &EngineConfig::default(), || Theme::Light);

    let report = app.load_report().expect("open should record a load report");
    assert_eq!(report.source, LoadSource::Stored);
    assert_eq!(report.skipped_entries, 2);
    assert_eq!(app.state().categories.len(), 1);
    assert_eq!(app.state().todo("t0").expect("todo should exist").title, "kept");
    assert!(app.is_dark_mode());

    app.flush();
    let rewritten = load_state(&store, KEY, || Theme::Light);
    assert_eq!(&rewritten, app.state());
    assert_ne!(rewritten, AppState::initial(Theme::Dark));
}

#[test]
fn empty_store_yields_seeded_categories() {
    let store = MemorySnapshotStore::new();

    let loaded = load_snapshot(&store, KEY, || Theme::Light);

    assert_eq!(loaded.report.source, LoadSource::Empty);
    let ids: Vec<&str> = loaded
        .state
        .categories
        .iter()
        .map(|category| category.id.as_str())
        .collect();
    assert_eq!(ids, vec!["personal", "work", "shopping", "goals"]);
    assert_eq!(loaded.state.categories[0].color, "#FF2D55");
    assert_eq!(loaded.state.categories[3].icon, "BookmarkIcon");
}

#[test]
fn valid_snapshot_round_trips_losslessly() {
    let mut app = TodoApp::open(MemorySnapshotStore::new(), &EngineConfig::default(), || {
        Theme::Light
    });
    let a = app
        .add_todo("a")
        .expect("add todo should succeed")
        .expect("a category should be selected");
    app.add_todo("b").expect("add todo should succeed");
    app.toggle_todo(&a);
    app.archive_todo(&a);
    app.toggle_archive_view();
    app.add_category("Books", "#FFCC00", "📚").expect("add category should succeed");

    let encoded = encode_state(app.state()).expect("encode should succeed");
    let store = MemorySnapshotStore::with_entry(KEY, encoded);

    assert_eq!(&load_state(&store, KEY, || Theme::Dark), app.state());
}

#[test]
fn open_rewrites_only_migrated_snapshots() {
    let legacy = MemorySnapshotStore::with_entry(KEY, legacy_snapshot());
    let mut app = TodoApp::open(&legacy, &EngineConfig::default(), || Theme::Light);
    assert!(app.load_report().expect("open should record a load report").needs_rewrite());
    app.flush();
    assert_eq!(legacy.write_count(), 1);

    let migrated = legacy
        .read(KEY)
        .expect("read should succeed")
        .expect("snapshot should be stored");
    let clean = MemorySnapshotStore::with_entry(KEY, migrated);
    let app = TodoApp::open(&clean, &EngineConfig::default(), || Theme::Light);
    assert!(!app.load_report().expect("open should record a load report").needs_rewrite());
    assert!(!app.has_pending_write());
}
