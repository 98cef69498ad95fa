//! Pure derivations consumed by presentation layers.
//!
//! # Responsibility
//! - Classify goals into display statuses.
//! - Group goals chronologically for timeline/archive screens.
//! - Compute the initial map viewport.
//!
//! # Invariants
//! - Every function here is side-effect free and never persists results.
//! - Calendar years are read in the device's local time zone.

pub mod map;
pub mod status;
pub mod timeline;
