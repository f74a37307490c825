//! Tracking engine for TACMAP.
//!
//! Owns the hecs-backed entity store, drives simulated telemetry on a
//! cooperative clock, filters the visible set and keeps an external map
//! surface in sync with it.

pub mod clock;
pub mod engine;
pub mod filter;
pub mod map_sync;
pub mod measurement;
pub mod seed;
pub mod store;
pub mod surface;
pub mod systems;

pub use engine::{EngineConfig, TacticalEngine};
pub use map_sync::{MapSurface, MapSyncAdapter};
pub use tacmap_core as core;
