//! Tactical engine: the single owner of all tracking state.
//!
//! `TacticalEngine` owns the entity store, filter, clock, measurement session
//! and map adapter, applies operator commands and produces `TacticalSnapshot`s.
//! It is headless and single-threaded; the host decides when time passes and
//! which map surface is used.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tacmap_core::commands::OperatorCommand;
use tacmap_core::constants::*;
use tacmap_core::entities::{Soldier, TrackedEntity};
use tacmap_core::enums::{EntityKind, SoldierStatus};
use tacmap_core::error::TacticalError;
use tacmap_core::events::UiEvent;
use tacmap_core::state::TacticalSnapshot;
use tacmap_core::types::{Coordinate, EntityRef, SimTime};

use crate::clock::SimulationClock;
use crate::filter::FilterEngine;
use crate::map_sync::{MapSurface, MapSyncAdapter, SyncReport};
use crate::measurement::MeasurementSession;
use crate::seed::SeedData;
use crate::store::EntityStore;
use crate::systems;
use crate::systems::snapshot::SnapshotSource;

/// Configuration for a new engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// RNG seed. Same seed and same inputs give the same telemetry.
    pub seed: u64,
    /// Period of the simulated telemetry feed.
    pub tick_interval_ms: u64,
    /// Maximum per-axis position jitter per tick, in degrees.
    pub jitter_deg: f64,
    /// Start with the telemetry feed running.
    pub real_time: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            jitter_deg: DEFAULT_JITTER_DEG,
            real_time: false,
        }
    }
}

pub struct TacticalEngine<S: MapSurface> {
    store: EntityStore,
    filter: FilterEngine,
    clock: SimulationClock,
    measurement: MeasurementSession,
    adapter: MapSyncAdapter<S>,
    rng: ChaCha8Rng,
    time: SimTime,
    tick_interval_ms: u64,
    jitter_deg: f64,
    selection: Option<EntityRef>,
    show_coordinates: bool,
    pointer: Option<Coordinate>,
    /// Visible set as of the last refresh.
    visible: Vec<TrackedEntity>,
    events: Vec<UiEvent>,
}

impl<S: MapSurface> TacticalEngine<S> {
    /// Create an engine with an empty store. Fails on a zero tick interval.
    pub fn new(config: EngineConfig, surface: S) -> Result<Self, TacticalError> {
        if config.tick_interval_ms == 0 {
            return Err(TacticalError::InvalidInterval);
        }
        let mut engine = Self {
            store: EntityStore::new(),
            filter: FilterEngine::default(),
            clock: SimulationClock::new(),
            measurement: MeasurementSession::new(),
            adapter: MapSyncAdapter::new(surface),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            time: SimTime::default(),
            tick_interval_ms: config.tick_interval_ms,
            jitter_deg: config.jitter_deg.clamp(0.0, MAX_JITTER_DEG),
            selection: None,
            show_coordinates: false,
            pointer: None,
            visible: Vec::new(),
            events: Vec::new(),
        };
        if config.real_time {
            engine.set_real_time(true)?;
        }
        Ok(engine)
    }

    /// Replace all entities with the seed. A seed that fails validation
    /// leaves the current store in place.
    pub fn load_seed(&mut self, seed: SeedData) -> Result<(), TacticalError> {
        self.store = seed.into_store()?;
        info!(
            soldiers = self.store.count(EntityKind::Soldier),
            entities = self.store.len(),
            "seed loaded"
        );
        let stale = self
            .selection
            .as_ref()
            .is_some_and(|selected| !self.store.contains(selected));
        if stale {
            self.set_selection(None);
        }
        self.refresh();
        Ok(())
    }

    /// Apply one operator command. Errors leave engine state untouched.
    pub fn apply(&mut self, command: OperatorCommand) -> Result<(), TacticalError> {
        match command {
            OperatorCommand::SetRealTime { enabled } => {
                self.set_real_time(enabled)?;
            }
            OperatorCommand::SetLayerVisible { layer, visible } => {
                if self.filter.set_layer(layer, visible) {
                    debug!(?layer, visible, "layer toggled");
                    self.refresh();
                }
            }
            OperatorCommand::SetStatusVisible { status, visible } => {
                if self.filter.set_status_visible(status, visible) {
                    debug!(?status, visible, "status filter toggled");
                    self.refresh();
                }
            }
            OperatorCommand::SetMeasurementMode { enabled } => {
                let before = self.measurement.points().to_vec();
                if enabled {
                    self.measurement.enable();
                } else {
                    self.measurement.disable();
                }
                info!(mode = ?self.measurement.mode(), "measurement mode");
                self.emit_measurement_if_changed(&before);
            }
            OperatorCommand::ResetMeasurement => {
                let before = self.measurement.points().to_vec();
                self.measurement.reset();
                self.emit_measurement_if_changed(&before);
            }
            OperatorCommand::MapClick { coordinate } => {
                coordinate.validate()?;
                let marker = self.adapter.surface().marker_at(&coordinate);
                self.handle_map_click(coordinate, marker)?;
            }
            OperatorCommand::Hover { coordinate } => {
                self.hover(coordinate);
            }
            OperatorCommand::Select { entity } => {
                self.select(entity)?;
            }
            OperatorCommand::SetShowCoordinates { enabled } => {
                self.show_coordinates = enabled;
                if !enabled {
                    self.pointer = None;
                }
            }
            OperatorCommand::UpdateSoldier {
                id,
                position,
                status,
            } => {
                self.upsert_soldier(&id, position, status)?;
            }
            OperatorCommand::Refresh => {
                self.refresh();
            }
        }
        Ok(())
    }

    /// Let `elapsed_ms` of host time pass, firing every due telemetry tick.
    /// Each tick's visibility and reconciliation complete before the next
    /// tick runs. Returns the number of ticks fired.
    pub fn advance(&mut self, elapsed_ms: u64) -> u32 {
        let mut clock = std::mem::take(&mut self.clock);
        let fired = clock.advance(elapsed_ms, |due_ms| self.run_tick(due_ms));
        self.clock = clock;
        self.time.elapsed_ms = self.clock.now_ms();
        fired
    }

    fn run_tick(&mut self, due_ms: u64) {
        self.time.elapsed_ms = due_ms;
        self.time.record_tick();
        systems::telemetry::run(&mut self.store, &mut self.rng, self.jitter_deg, due_ms);
        self.refresh();
    }

    /// Start or stop the telemetry feed. Returns whether the mode changed.
    pub fn set_real_time(&mut self, enabled: bool) -> Result<bool, TacticalError> {
        let changed = if enabled {
            self.clock.start(self.tick_interval_ms)?
        } else {
            let was_running = self.clock.is_running();
            self.clock.stop();
            was_running
        };
        if changed {
            info!(enabled, interval_ms = self.tick_interval_ms, "real-time telemetry");
        }
        Ok(changed)
    }

    pub fn is_real_time(&self) -> bool {
        self.clock.is_running()
    }

    /// Map-surface click with the marker the surface found under it. A click
    /// on a marker selects its entity; a click on open map area is a
    /// measurement point.
    pub fn handle_map_click(
        &mut self,
        coordinate: Coordinate,
        marker: Option<S::Handle>,
    ) -> Result<(), TacticalError> {
        let click = self.adapter.resolve_click(coordinate, marker);
        self.click(click.coordinate, click.entity)
    }

    fn click(&mut self, coordinate: Coordinate, entity: Option<EntityRef>) -> Result<(), TacticalError> {
        match entity {
            Some(entity) => self.select(Some(entity)),
            None => {
                coordinate.validate()?;
                if self.measurement.add_point(coordinate) {
                    let event = self.measurement_event();
                    self.events.push(event);
                }
                Ok(())
            }
        }
    }

    /// Pointer moved over the map. Tracked only while the read-out is on.
    pub fn hover(&mut self, coordinate: Coordinate) {
        if self.show_coordinates {
            self.pointer = Some(coordinate.clamped());
        }
    }

    /// Select an entity, or clear the selection with `None`.
    pub fn select(&mut self, entity: Option<EntityRef>) -> Result<(), TacticalError> {
        if let Some(key) = &entity {
            if !self.store.contains(key) {
                return Err(TacticalError::NotFound {
                    entity: key.clone(),
                });
            }
        }
        self.set_selection(entity);
        Ok(())
    }

    fn set_selection(&mut self, entity: Option<EntityRef>) {
        if self.selection != entity {
            self.selection = entity.clone();
            self.events.push(UiEvent::SelectionChanged { entity });
        }
    }

    pub fn selection(&self) -> Option<&EntityRef> {
        self.selection.as_ref()
    }

    /// External telemetry report, stamped with the current simulation time.
    pub fn upsert_soldier(
        &mut self,
        id: &str,
        position: Coordinate,
        status: SoldierStatus,
    ) -> Result<Soldier, TacticalError> {
        let soldier = self
            .store
            .upsert_soldier(id, position, status, self.time.elapsed_ms)?;
        self.refresh();
        Ok(soldier)
    }

    /// Recompute the visible set and reconcile the map surface with it.
    ///
    /// Returns the reconciliation report, or `None` when the surface is not
    /// ready and the pass was deferred.
    pub fn refresh(&mut self) -> Option<SyncReport> {
        let visible = self.filter.visible_entities(&self.store);
        if visible != self.visible {
            self.visible = visible;
            self.events.push(UiEvent::VisibilitySetChanged {
                entities: self.visible.clone(),
            });
        }

        match self.adapter.reconcile(&self.visible) {
            Ok(report) => Some(report),
            Err(err) if err.is_recoverable() => {
                debug!(error = %err, "reconciliation deferred");
                None
            }
            Err(err) => {
                warn!(error = %err, "reconciliation failed");
                None
            }
        }
    }

    /// The host reports that the surface finished initializing. Runs the
    /// deferred reconciliation, if any.
    pub fn notify_surface_ready(&mut self) -> Option<SyncReport> {
        if self.adapter.is_pending() {
            info!("map surface ready");
            self.refresh()
        } else {
            None
        }
    }

    /// Take all UI events emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> TacticalSnapshot {
        systems::snapshot::build_snapshot(SnapshotSource {
            store: &self.store,
            filter: &self.filter,
            measurement: &self.measurement,
            map: self.adapter.status(),
            time: self.time,
            real_time: self.clock.is_running(),
            tick_interval_ms: self.tick_interval_ms,
            selection: self.selection.as_ref(),
            pointer: if self.show_coordinates {
                self.pointer
            } else {
                None
            },
        })
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterEngine {
        &self.filter
    }

    pub fn measurement(&self) -> &MeasurementSession {
        &self.measurement
    }

    pub fn adapter(&self) -> &MapSyncAdapter<S> {
        &self.adapter
    }

    /// Host-side surface setup (initialization, viewport).
    pub fn surface_mut(&mut self) -> &mut S {
        self.adapter.surface_mut()
    }

    fn measurement_event(&self) -> UiEvent {
        UiEvent::MeasurementChanged {
            points: self.measurement.points().to_vec(),
            cumulative_distance_km: self.measurement.cumulative_distance_km(),
        }
    }

    fn emit_measurement_if_changed(&mut self, before: &[Coordinate]) {
        if self.measurement.points() != before {
            let event = self.measurement_event();
            self.events.push(event);
        }
    }
}
