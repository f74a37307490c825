//! Tracked entity records.
//!
//! These are owned copies handed out by the entity store; mutating one never
//! touches canonical state.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Coordinate, EntityRef};

/// A soldier unit with live (simulated) telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Soldier {
    pub id: String,
    pub display_name: String,
    pub position: Coordinate,
    pub status: SoldierStatus,
    pub mission_ref: String,
    /// Simulation time of the last telemetry refresh (ms).
    #[serde(default)]
    pub last_update_ms: u64,
    /// Number of telemetry refreshes applied since creation.
    #[serde(default)]
    pub revision: u64,
}

/// Polygonal area of operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationZone {
    pub id: String,
    pub name: String,
    /// Ordered polygon vertices, at least three.
    pub boundary: Vec<Coordinate>,
    pub kind: ZoneKind,
    #[serde(default)]
    pub description: String,
}

/// Point objective attached to a mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionObjective {
    pub id: String,
    pub name: String,
    pub position: Coordinate,
    pub kind: ObjectiveKind,
    pub status: ObjectiveStatus,
    #[serde(default)]
    pub description: String,
}

/// Any entity that can appear on the tactical map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TrackedEntity {
    Soldier(Soldier),
    Zone(OperationZone),
    Objective(MissionObjective),
}

impl TrackedEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            TrackedEntity::Soldier(_) => EntityKind::Soldier,
            TrackedEntity::Zone(_) => EntityKind::Zone,
            TrackedEntity::Objective(_) => EntityKind::Objective,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            TrackedEntity::Soldier(s) => &s.id,
            TrackedEntity::Zone(z) => &z.id,
            TrackedEntity::Objective(o) => &o.id,
        }
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.kind(), self.id())
    }

    /// Display label (soldier call sign, zone or objective name).
    pub fn label(&self) -> &str {
        match self {
            TrackedEntity::Soldier(s) => &s.display_name,
            TrackedEntity::Zone(z) => &z.name,
            TrackedEntity::Objective(o) => &o.name,
        }
    }

    pub fn as_soldier(&self) -> Option<&Soldier> {
        match self {
            TrackedEntity::Soldier(s) => Some(s),
            _ => None,
        }
    }
}
