//! Operator commands sent from the presentation layer to the engine.
//!
//! Commands are applied synchronously between ticks; caller errors are
//! returned to the sender and leave engine state untouched.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Coordinate, EntityRef};

/// All possible operator actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OperatorCommand {
    // --- Real-time simulation ---
    /// Start or stop the simulated telemetry feed.
    SetRealTime { enabled: bool },

    // --- Filters ---
    /// Show or hide a whole map layer.
    SetLayerVisible { layer: Layer, visible: bool },
    /// Include or exclude soldiers with the given status.
    SetStatusVisible { status: SoldierStatus, visible: bool },

    // --- Measurement ---
    /// Enter or leave distance measurement mode.
    SetMeasurementMode { enabled: bool },
    /// Clear measured points, staying in measurement mode.
    ResetMeasurement,

    // --- Map interaction ---
    /// Click on the map. The surface resolves it to the marker underneath,
    /// if any.
    MapClick { coordinate: Coordinate },
    /// Pointer moved over the map.
    Hover { coordinate: Coordinate },
    /// Select an entity (or clear the selection).
    Select { entity: Option<EntityRef> },
    /// Toggle the pointer coordinate read-out.
    SetShowCoordinates { enabled: bool },

    // --- Telemetry ---
    /// Push an external position/status report for a soldier.
    UpdateSoldier {
        id: String,
        position: Coordinate,
        status: SoldierStatus,
    },
    /// Force visibility recomputation and marker reconciliation.
    Refresh,
}
