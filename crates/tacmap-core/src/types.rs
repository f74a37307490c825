//! Fundamental geographic and simulation types.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_LATITUDE, MAX_LONGITUDE};
use crate::enums::EntityKind;
use crate::error::TacticalError;

/// Geographic position in decimal degrees (WGS-84).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside [-90, 90] x [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, TacticalError> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// True when both axes are finite and inside their legal range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-MAX_LATITUDE..=MAX_LATITUDE).contains(&self.latitude)
            && (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&self.longitude)
    }

    pub fn validate(&self) -> Result<(), TacticalError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(TacticalError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Clamp both axes back into the legal range.
    pub fn clamped(self) -> Self {
        Self {
            latitude: self.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            longitude: self.longitude.clamp(-MAX_LONGITUDE, MAX_LONGITUDE),
        }
    }

    /// Offset by a latitude/longitude delta in degrees, clamped.
    pub fn offset(self, d_lat: f64, d_lon: f64) -> Self {
        Self {
            latitude: self.latitude + d_lat,
            longitude: self.longitude + d_lon,
        }
        .clamped()
    }

    /// (longitude, latitude) as a plane vector, x = East, y = North.
    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.longitude, self.latitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude < 0.0 { 'S' } else { 'N' };
        let ew = if self.longitude < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.6}°{ns}, {:.6}°{ew}",
            self.latitude.abs(),
            self.longitude.abs()
        )
    }
}

/// Cross-kind entity key. Ids are only unique within one kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn soldier(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Soldier, id)
    }

    pub fn zone(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Zone, id)
    }

    pub fn objective(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Objective, id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.kind, self.id)
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of simulation ticks fired so far.
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: u64,
}

impl SimTime {
    /// Record a fired tick.
    pub fn record_tick(&mut self) {
        self.tick += 1;
    }
}
