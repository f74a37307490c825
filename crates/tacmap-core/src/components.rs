//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! The entity store assembles them into `TrackedEntity` records on read.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Coordinate;

/// Immutable soldier identity, fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Callsign {
    pub id: String,
    pub display_name: String,
    pub mission_ref: String,
}

/// Mutable soldier telemetry. Replaced as a whole on every update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Telemetry {
    pub position: Coordinate,
    pub status: SoldierStatus,
    pub last_update_ms: u64,
    pub revision: u64,
}

/// Zone identity and classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneInfo {
    pub id: String,
    pub name: String,
    pub kind: ZoneKind,
    pub description: String,
}

/// Zone polygon vertices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundary {
    pub points: Vec<Coordinate>,
}

/// Objective identity and progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveInfo {
    pub id: String,
    pub name: String,
    pub kind: ObjectiveKind,
    pub status: ObjectiveStatus,
    pub description: String,
}

/// Fixed map position (objectives).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Anchor {
    pub position: Coordinate,
}
