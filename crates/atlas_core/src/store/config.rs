//! Store configuration.

/// Namespace key the goal blob is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "atlas-goals-storage";

/// Collection used when no valid blob can be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedPolicy {
    /// Start from an empty collection.
    #[default]
    Empty,
    /// Start from the built-in sample goals.
    Sample,
}

/// Construction options for `GoalStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage_key: String,
    pub seed: SeedPolicy,
}

impl StoreConfig {
    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }

    pub fn with_seed(mut self, seed: SeedPolicy) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed: SeedPolicy::default(),
        }
    }
}
