//! Flutter-facing bindings over `atlas_core`.

pub mod api;
