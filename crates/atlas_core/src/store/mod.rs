//! Goal store: the session-wide owner of goal state.
//!
//! # Responsibility
//! - Hold the authoritative goal collection and its durable mirror.
//! - Expose CRUD, completion and selector APIs to UI/FFI layers.
//! - Publish change events to subscribed presentation consumers.
//!
//! # Invariants
//! - One store instance per session, owned by the composition root.
//! - All mutations are synchronous on the caller's thread.

pub mod config;
pub mod events;
mod goal_store;
pub mod query;
pub mod seed;

pub use config::{SeedPolicy, StoreConfig, DEFAULT_STORAGE_KEY};
pub use events::{GoalEvent, SubscriptionId};
pub use goal_store::GoalStore;
pub use query::GoalQuery;
