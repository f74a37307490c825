//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

/// Kind of tracked entity. Identifiers are scoped per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Soldier,
    Zone,
    Objective,
}

/// Soldier unit reporting status.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SoldierStatus {
    #[default]
    Active,
    /// Unit has raised an alert; rendered pulsing.
    Alert,
    /// No telemetry from the unit.
    Offline,
}

impl SoldierStatus {
    pub const ALL: [SoldierStatus; 3] = [
        SoldierStatus::Active,
        SoldierStatus::Alert,
        SoldierStatus::Offline,
    ];
}

/// Operation zone classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    #[default]
    Secure,
    Danger,
    Restricted,
}

/// Mission objective priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    #[default]
    Primary,
    Secondary,
    Intel,
}

/// Mission objective progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Map layer toggled by the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Soldiers,
    Zones,
    Objectives,
}

/// Measurement tool state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementMode {
    #[default]
    Inactive,
    Active,
}

/// Readiness of the external map surface as seen by the sync adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceReadiness {
    /// Surface not initialized yet; reconciliation is deferred.
    #[default]
    NotReady,
    /// Markers match the visible set.
    Synced,
    /// Last reconciliation hit per-marker surface failures.
    Degraded,
}
