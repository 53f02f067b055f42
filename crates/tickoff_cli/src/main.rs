//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `tickoff_core` linkage and storage bootstrap end to end.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `tickoff_cli [DB_PATH]`. Without a path an in-memory database is used.

use std::process::ExitCode;
use tickoff_core::db::{open_db, open_db_in_memory};
use tickoff_core::{EngineConfig, SqliteSnapshotStore, Theme, TodoApp};

fn main() -> ExitCode {
    let db_path = std::env::args().nth(1);
    let conn = match db_path.as_deref() {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    let conn = match conn {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("tickoff_core db_open error={err}");
            return ExitCode::FAILURE;
        }
    };
    let store = match SqliteSnapshotStore::try_new(&conn) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("tickoff_core store error={err}");
            return ExitCode::FAILURE;
        }
    };

    let system_theme = std::env::var("TICKOFF_THEME")
        .ok()
        .and_then(|value| Theme::from_preference(&value))
        .unwrap_or_default();
    let mut app = TodoApp::open(store, &EngineConfig::default(), || system_theme);

    println!("tickoff_core version={}", tickoff_core::core_version());
    println!(
        "tickoff_core categories={} todos={} theme={}",
        app.state().categories.len(),
        app.state().todos.len(),
        app.state().theme.as_str()
    );
    if let Some(report) = app.load_report() {
        println!("tickoff_core load_source={:?}", report.source);
    }

    app.flush();
    ExitCode::SUCCESS
}
