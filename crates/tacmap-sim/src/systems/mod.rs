//! Per-tick systems that operate on engine state.
//!
//! Systems are plain functions over the store (or read-only views of it).
//! They do not own state.

pub mod snapshot;
pub mod telemetry;
