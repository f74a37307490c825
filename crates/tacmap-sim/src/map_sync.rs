//! Map synchronization: keeps an external marker set in line with the visible
//! entity set.
//!
//! `MapSyncAdapter` is the only caller of the `MapSurface` capability. Each
//! reconciliation creates markers for newly visible entities, updates bound
//! markers in place when their geometry or style changed, and destroys markers
//! whose entity left the visible set. Nothing is sent when nothing changed.
//!
//! Surface failures never escape as fatal errors: a surface that is not
//! initialized defers the whole pass (`SurfaceNotReady`), and per-marker
//! failures only flip the status to degraded and are retried on the next pass.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;
use tracing::{debug, warn};

use tacmap_core::constants::*;
use tacmap_core::entities::TrackedEntity;
use tacmap_core::enums::*;
use tacmap_core::error::TacticalError;
use tacmap_core::state::MapStatusView;
use tacmap_core::types::{Coordinate, EntityRef};

/// Failure reported by a map surface for a single marker operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("surface not initialized")]
    NotInitialized,
    #[error("unknown marker handle")]
    UnknownHandle,
    #[error("surface rejected marker: {0}")]
    Rejected(String),
}

/// Marker shape on the map.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerGeometry {
    Point(Coordinate),
    Polygon(Vec<Coordinate>),
}

/// Visual attributes of a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub kind: EntityKind,
    pub label: String,
    /// CSS colour (stroke for points, fill for polygons).
    pub color: &'static str,
    pub icon: Option<&'static str>,
    /// Draw attention (alerting units).
    pub pulsing: bool,
    /// De-emphasize (completed objectives).
    pub faded: bool,
}

/// Everything the surface needs to draw one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub geometry: MarkerGeometry,
    pub style: MarkerStyle,
}

/// External map-rendering capability driven by the adapter.
pub trait MapSurface {
    /// Opaque marker handle issued by the surface.
    type Handle: Copy + Eq + Hash + Debug;

    fn is_initialized(&self) -> bool;

    fn create_marker(
        &mut self,
        geometry: &MarkerGeometry,
        style: &MarkerStyle,
    ) -> Result<Self::Handle, SurfaceError>;

    fn update_marker(
        &mut self,
        handle: Self::Handle,
        geometry: &MarkerGeometry,
        style: &MarkerStyle,
    ) -> Result<(), SurfaceError>;

    fn destroy_marker(&mut self, handle: Self::Handle) -> Result<(), SurfaceError>;

    /// Marker drawn at `coordinate`, if any. Surfaces without hit testing
    /// report every click as open map area.
    fn marker_at(&self, _coordinate: &Coordinate) -> Option<Self::Handle> {
        None
    }
}

/// Counts of surface calls made by one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: u32,
    pub updated: u32,
    pub destroyed: u32,
    /// Surface calls that failed (included in the counts above).
    pub failed: u32,
}

impl SyncReport {
    /// Total surface mutations attempted.
    pub fn mutations(&self) -> u32 {
        self.created + self.updated + self.destroyed
    }

    pub fn is_noop(&self) -> bool {
        self.mutations() == 0
    }
}

/// A click forwarded from the surface, resolved to an entity when it hit a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MapClick {
    pub entity: Option<EntityRef>,
    pub coordinate: Coordinate,
}

#[derive(Debug)]
struct Binding<H> {
    handle: H,
    /// Attributes last accepted by the surface.
    rendered: MarkerSpec,
}

pub struct MapSyncAdapter<S: MapSurface> {
    surface: S,
    bindings: HashMap<EntityRef, Binding<S::Handle>>,
    by_handle: HashMap<S::Handle, EntityRef>,
    pending: bool,
    degraded: bool,
}

impl<S: MapSurface> MapSyncAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            bindings: HashMap::new(),
            by_handle: HashMap::new(),
            pending: false,
            degraded: false,
        }
    }

    /// Whether the surface can accept reconciliation.
    pub fn is_ready(&self) -> bool {
        self.surface.is_initialized()
    }

    /// A reconciliation was deferred and is waiting for the surface.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for host-side setup (credentials, viewport). Markers
    /// must still only be changed through `reconcile`.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn handle_for(&self, entity: &EntityRef) -> Option<S::Handle> {
        self.bindings.get(entity).map(|binding| binding.handle)
    }

    pub fn status(&self) -> MapStatusView {
        let readiness = if !self.is_ready() {
            SurfaceReadiness::NotReady
        } else if self.degraded {
            SurfaceReadiness::Degraded
        } else {
            SurfaceReadiness::Synced
        };
        MapStatusView {
            readiness,
            markers: self.bindings.len() as u32,
            pending: self.pending,
        }
    }

    /// Make the surface's marker set match `visible`.
    pub fn reconcile(&mut self, visible: &[TrackedEntity]) -> Result<SyncReport, TacticalError> {
        if !self.surface.is_initialized() {
            self.pending = true;
            return Err(TacticalError::SurfaceNotReady);
        }

        let mut report = SyncReport::default();
        let mut targeted = HashSet::with_capacity(visible.len());

        for entity in visible {
            let key = entity.entity_ref();
            let spec = marker_spec(entity);

            match self.bindings.get_mut(&key) {
                None => {
                    report.created += 1;
                    match self.surface.create_marker(&spec.geometry, &spec.style) {
                        Ok(handle) => {
                            self.by_handle.insert(handle, key.clone());
                            self.bindings.insert(
                                key.clone(),
                                Binding {
                                    handle,
                                    rendered: spec,
                                },
                            );
                        }
                        Err(err) => {
                            report.failed += 1;
                            warn!(entity = %key, error = %err, "marker create failed");
                        }
                    }
                }
                Some(binding) if binding.rendered != spec => {
                    report.updated += 1;
                    match self
                        .surface
                        .update_marker(binding.handle, &spec.geometry, &spec.style)
                    {
                        Ok(()) => binding.rendered = spec,
                        Err(err) => {
                            report.failed += 1;
                            warn!(entity = %key, error = %err, "marker update failed");
                        }
                    }
                }
                Some(_) => {}
            }
            targeted.insert(key);
        }

        let stale: Vec<EntityRef> = self
            .bindings
            .keys()
            .filter(|key| !targeted.contains(*key))
            .cloned()
            .collect();
        for key in stale {
            if let Some(binding) = self.bindings.remove(&key) {
                self.by_handle.remove(&binding.handle);
                report.destroyed += 1;
                if let Err(err) = self.surface.destroy_marker(binding.handle) {
                    report.failed += 1;
                    warn!(entity = %key, error = %err, "marker destroy failed, binding released");
                }
            }
        }

        self.pending = false;
        self.degraded = report.failed > 0;
        if !report.is_noop() {
            debug!(
                created = report.created,
                updated = report.updated,
                destroyed = report.destroyed,
                failed = report.failed,
                "map reconciled"
            );
        }
        Ok(report)
    }

    /// Resolve a surface click. A click on an unknown or missing marker is a
    /// click on open map area.
    pub fn resolve_click(&self, coordinate: Coordinate, marker: Option<S::Handle>) -> MapClick {
        MapClick {
            entity: marker.and_then(|handle| self.by_handle.get(&handle).cloned()),
            coordinate,
        }
    }
}

/// Derive marker geometry and style from an entity.
pub fn marker_spec(entity: &TrackedEntity) -> MarkerSpec {
    match entity {
        TrackedEntity::Soldier(soldier) => MarkerSpec {
            geometry: MarkerGeometry::Point(soldier.position),
            style: MarkerStyle {
                kind: EntityKind::Soldier,
                label: soldier.display_name.clone(),
                color: match soldier.status {
                    SoldierStatus::Active => COLOR_ACTIVE,
                    SoldierStatus::Alert => COLOR_ALERT,
                    SoldierStatus::Offline => COLOR_OFFLINE,
                },
                icon: Some("users"),
                pulsing: soldier.status == SoldierStatus::Alert,
                faded: false,
            },
        },
        TrackedEntity::Zone(zone) => MarkerSpec {
            geometry: MarkerGeometry::Polygon(zone.boundary.clone()),
            style: MarkerStyle {
                kind: EntityKind::Zone,
                label: zone.name.clone(),
                color: match zone.kind {
                    ZoneKind::Secure => ZONE_FILL_SECURE,
                    ZoneKind::Danger => ZONE_FILL_DANGER,
                    ZoneKind::Restricted => ZONE_FILL_RESTRICTED,
                },
                icon: None,
                pulsing: false,
                faded: false,
            },
        },
        TrackedEntity::Objective(objective) => MarkerSpec {
            geometry: MarkerGeometry::Point(objective.position),
            style: MarkerStyle {
                kind: EntityKind::Objective,
                label: objective.name.clone(),
                color: match objective.kind {
                    ObjectiveKind::Primary => COLOR_OBJECTIVE_PRIMARY,
                    ObjectiveKind::Secondary => COLOR_OBJECTIVE_SECONDARY,
                    ObjectiveKind::Intel => COLOR_OBJECTIVE_INTEL,
                },
                icon: Some(match objective.kind {
                    ObjectiveKind::Primary => "🎯",
                    ObjectiveKind::Secondary => "📍",
                    ObjectiveKind::Intel => "📋",
                }),
                pulsing: false,
                faded: objective.status == ObjectiveStatus::Completed,
            },
        },
    }
}
