//! Core domain logic for Atlas.
//! This crate is the single source of truth for goal invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod storage;
pub mod store;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::category::{Category, CategoryMeta};
pub use model::goal::{Goal, GoalDraft, GoalId, GoalPatch, Location, ModelError};
pub use persist::{
    decode_blob, deserialize_goal, encode_blob, serialize_goal, PersistError, PersistedGoal,
};
pub use storage::{BlobStore, MemoryBlobStore, SqliteBlobStore, StorageError, StorageResult};
pub use store::{
    GoalEvent, GoalQuery, GoalStore, SeedPolicy, StoreConfig, SubscriptionId,
    DEFAULT_STORAGE_KEY,
};
pub use view::map::{map_region, MapRegion};
pub use view::status::{goal_status, status_at, GoalStatus};
pub use view::timeline::{group_by_year, group_by_year_in, YearGroup};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
