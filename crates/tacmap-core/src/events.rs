//! Events emitted by the engine for presentation layers (tab panels, legends).

use serde::{Deserialize, Serialize};

use crate::entities::TrackedEntity;
use crate::types::{Coordinate, EntityRef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiEvent {
    /// Selected entity changed (`None` = selection cleared).
    SelectionChanged { entity: Option<EntityRef> },
    /// Measurement points or distance changed.
    MeasurementChanged {
        points: Vec<Coordinate>,
        cumulative_distance_km: f64,
    },
    /// The filtered visible set changed.
    VisibilitySetChanged { entities: Vec<TrackedEntity> },
}
