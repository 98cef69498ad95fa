//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `atlas_core` linkage without the Flutter/FFI runtime.
//! - Summarize the goal database named by `ATLAS_DB_PATH`, if set.

use atlas_core::db::open_db;
use atlas_core::{group_by_year, GoalStore, SqliteBlobStore, StoreConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("atlas_core ping={}", atlas_core::ping());
    println!("atlas_core version={}", atlas_core::core_version());

    let Some(db_path) = std::env::var_os("ATLAS_DB_PATH") else {
        return ExitCode::SUCCESS;
    };

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open goal database: {err}");
            return ExitCode::FAILURE;
        }
    };
    let backend = match SqliteBlobStore::try_new(&conn) {
        Ok(backend) => backend,
        Err(err) => {
            eprintln!("failed to open goal storage: {err}");
            return ExitCode::FAILURE;
        }
    };

    let store = GoalStore::open(backend, StoreConfig::default());
    println!(
        "goals total={} completed={} located={}",
        store.total_count(),
        store.completed_count(),
        store.goals_with_location().len()
    );
    for group in group_by_year(store.goals()) {
        println!("year={} goals={}", group.year, group.goals.len());
    }
    ExitCode::SUCCESS
}
