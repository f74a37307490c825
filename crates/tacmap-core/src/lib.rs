//! Core types and definitions for the TACMAP tracking engine.
//!
//! This crate defines the vocabulary shared across the other crates:
//! coordinates, entity records, components, commands, events, snapshot
//! views, the error taxonomy and the geodesic helpers.
//! It has no dependency on any rendering backend or runtime.

pub mod commands;
pub mod components;
pub mod constants;
pub mod entities;
pub mod enums;
pub mod error;
pub mod events;
pub mod geo;
pub mod state;
pub mod types;

pub use error::TacticalError;
