//! Snapshot system: assembles a complete `TacticalSnapshot` from engine state.
//!
//! Read-only. Nothing here mutates the store.

use tacmap_core::entities::TrackedEntity;
use tacmap_core::enums::*;
use tacmap_core::state::*;
use tacmap_core::types::{Coordinate, EntityRef, SimTime};

use crate::filter::FilterEngine;
use crate::measurement::MeasurementSession;
use crate::store::EntityStore;

/// Engine state borrowed for one snapshot.
pub struct SnapshotSource<'a> {
    pub store: &'a EntityStore,
    pub filter: &'a FilterEngine,
    pub measurement: &'a MeasurementSession,
    pub map: MapStatusView,
    pub time: SimTime,
    pub real_time: bool,
    pub tick_interval_ms: u64,
    pub selection: Option<&'a EntityRef>,
    pub pointer: Option<Coordinate>,
}

pub fn build_snapshot(source: SnapshotSource<'_>) -> TacticalSnapshot {
    TacticalSnapshot {
        time: source.time,
        real_time: source.real_time,
        tick_interval_ms: source.tick_interval_ms,
        filter: source.filter.config().clone(),
        visible: source.filter.visible_entities(source.store),
        selection: build_selection(source.store, source.selection),
        measurement: source.measurement.view(),
        summary: build_summary(source.store),
        map: source.map,
        pointer: source.pointer,
    }
}

/// The selection with its latest record. A selection whose entity has gone
/// is dropped from the view.
fn build_selection(store: &EntityStore, selection: Option<&EntityRef>) -> Option<SelectionView> {
    let entity = selection?;
    store.get(entity).ok().map(|record| SelectionView {
        entity: entity.clone(),
        record,
    })
}

/// Counters over the whole store, independent of the filter.
pub fn build_summary(store: &EntityStore) -> SummaryView {
    let mut summary = SummaryView::default();

    for soldier in store.soldiers() {
        match soldier.status {
            SoldierStatus::Active => summary.active_units += 1,
            SoldierStatus::Alert => summary.alert_units += 1,
            SoldierStatus::Offline => summary.offline_units += 1,
        }
    }

    for entity in store.list_entities(EntityKind::Objective) {
        if let TrackedEntity::Objective(objective) = entity {
            summary.objectives_total += 1;
            if objective.status == ObjectiveStatus::Completed {
                summary.objectives_completed += 1;
            }
        }
    }

    summary.zones_total = store.count(EntityKind::Zone) as u32;
    summary
}
