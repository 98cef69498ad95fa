//! Domain model for bucket-list goals.
//!
//! # Responsibility
//! - Define canonical data structures used by the goal store.
//! - Keep one goal shape for gallery, map, timeline and archive views.
//!
//! # Invariants
//! - Every goal is identified by a stable `GoalId`.
//! - Deletion is permanent; there are no tombstones.

pub mod category;
pub mod goal;
pub mod time;
