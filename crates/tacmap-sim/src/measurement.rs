//! Distance measurement tool.
//!
//! `Inactive -> Active (enable) -> Inactive (disable)`. The cumulative distance
//! is recomputed from the point list on every change and never set directly.

use tacmap_core::enums::MeasurementMode;
use tacmap_core::geo;
use tacmap_core::state::{LegView, MeasurementView};
use tacmap_core::types::Coordinate;

#[derive(Debug, Clone, Default)]
pub struct MeasurementSession {
    mode: MeasurementMode,
    points: Vec<Coordinate>,
    cumulative_distance_km: f64,
}

impl MeasurementSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> MeasurementMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode == MeasurementMode::Active
    }

    /// Enter measurement mode with an empty path. No-op when already active.
    pub fn enable(&mut self) {
        if !self.is_active() {
            self.mode = MeasurementMode::Active;
            self.clear();
        }
    }

    /// Leave measurement mode, discarding all points.
    pub fn disable(&mut self) {
        self.mode = MeasurementMode::Inactive;
        self.clear();
    }

    /// Append a point. Ignored (returns `false`) while inactive.
    pub fn add_point(&mut self, point: Coordinate) -> bool {
        if !self.is_active() {
            return false;
        }
        self.points.push(point);
        self.recompute();
        true
    }

    /// Clear the path and stay active.
    pub fn reset(&mut self) {
        self.clear();
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn cumulative_distance_km(&self) -> f64 {
        self.cumulative_distance_km
    }

    /// Per-leg distance and initial bearing.
    pub fn legs(&self) -> Vec<LegView> {
        self.points
            .windows(2)
            .map(|leg| LegView {
                distance_km: geo::distance_km(&leg[0], &leg[1]),
                bearing_deg: geo::initial_bearing_deg(&leg[0], &leg[1]),
            })
            .collect()
    }

    pub fn view(&self) -> MeasurementView {
        MeasurementView {
            mode: self.mode,
            points: self.points.clone(),
            cumulative_distance_km: self.cumulative_distance_km,
            legs: self.legs(),
        }
    }

    fn clear(&mut self) {
        self.points.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.cumulative_distance_km = geo::path_length_km(&self.points);
    }
}
