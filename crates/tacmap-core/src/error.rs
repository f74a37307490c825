//! Error taxonomy for engine operations.
//!
//! Caller errors (`NotFound`, `InvalidCoordinate`, ...) are returned before any
//! state is touched. `SurfaceNotReady` is recoverable: the sync adapter defers
//! and retries on the next state change.

use thiserror::Error;

use crate::types::EntityRef;

#[derive(Debug, Error)]
pub enum TacticalError {
    #[error("entity {entity} not found")]
    NotFound { entity: EntityRef },

    #[error("coordinate out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("map surface is not initialized")]
    SurfaceNotReady,

    #[error("zone {id} needs at least 3 boundary points, got {points}")]
    InvalidZone { id: String, points: usize },

    #[error("entity {entity} already exists")]
    DuplicateEntity { entity: EntityRef },

    #[error("tick interval must be positive")]
    InvalidInterval,

    #[error("invalid seed data: {0}")]
    Seed(#[from] serde_json::Error),
}

impl TacticalError {
    /// Whether the error is a transient surface condition rather than a caller mistake.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TacticalError::SurfaceNotReady)
    }
}
