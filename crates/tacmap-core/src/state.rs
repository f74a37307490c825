//! Engine state snapshot: the complete visible state handed to presentation layers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::entities::TrackedEntity;
use crate::enums::*;
use crate::types::{Coordinate, EntityRef, SimTime};

/// User-controlled visibility filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfiguration {
    pub show_soldiers: bool,
    pub show_objectives: bool,
    pub show_zones: bool,
    pub soldier_statuses: BTreeSet<SoldierStatus>,
}

impl Default for FilterConfiguration {
    fn default() -> Self {
        Self {
            show_soldiers: true,
            show_objectives: true,
            show_zones: true,
            soldier_statuses: SoldierStatus::ALL.into_iter().collect(),
        }
    }
}

/// Complete engine state, built on demand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TacticalSnapshot {
    pub time: SimTime,
    pub real_time: bool,
    pub tick_interval_ms: u64,
    pub filter: FilterConfiguration,
    pub visible: Vec<TrackedEntity>,
    pub selection: Option<SelectionView>,
    pub measurement: MeasurementView,
    pub summary: SummaryView,
    pub map: MapStatusView,
    /// Pointer position, only when the coordinate read-out is enabled.
    pub pointer: Option<Coordinate>,
}

/// Currently selected entity with its latest record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionView {
    pub entity: EntityRef,
    pub record: TrackedEntity,
}

/// Measurement tool state for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeasurementView {
    pub mode: MeasurementMode,
    pub points: Vec<Coordinate>,
    pub cumulative_distance_km: f64,
    pub legs: Vec<LegView>,
}

/// One measured leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegView {
    pub distance_km: f64,
    /// Initial bearing in degrees, clockwise from north.
    pub bearing_deg: f64,
}

/// Tactical summary counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryView {
    pub active_units: u32,
    pub alert_units: u32,
    pub offline_units: u32,
    pub objectives_completed: u32,
    pub objectives_total: u32,
    pub zones_total: u32,
}

/// Map surface synchronization status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapStatusView {
    pub readiness: SurfaceReadiness,
    /// Number of markers currently bound.
    pub markers: u32,
    /// A reconciliation is waiting for the surface.
    pub pending: bool,
}
