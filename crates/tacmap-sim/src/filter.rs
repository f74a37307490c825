//! Filter engine: derives the visible subset of entities.
//!
//! `visible_entities` is a pure function of the store and the filter
//! configuration. Output order is soldiers, zones, objectives, each in store order.

use tacmap_core::entities::TrackedEntity;
use tacmap_core::enums::{EntityKind, Layer, SoldierStatus};
use tacmap_core::state::FilterConfiguration;

use crate::store::EntityStore;

/// Compute the visible entity set.
pub fn visible_entities(store: &EntityStore, config: &FilterConfiguration) -> Vec<TrackedEntity> {
    let mut visible = Vec::new();

    if config.show_soldiers {
        visible.extend(
            store
                .list_entities(EntityKind::Soldier)
                .into_iter()
                .filter(|entity| match entity {
                    TrackedEntity::Soldier(s) => config.soldier_statuses.contains(&s.status),
                    _ => false,
                }),
        );
    }
    if config.show_zones {
        visible.extend(store.list_entities(EntityKind::Zone));
    }
    if config.show_objectives {
        visible.extend(store.list_entities(EntityKind::Objective));
    }

    visible
}

/// Owner of the filter configuration. Mutated only through explicit toggles.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    config: FilterConfiguration,
}

impl FilterEngine {
    pub fn new(config: FilterConfiguration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfiguration {
        &self.config
    }

    /// Show or hide a layer. Returns whether the configuration changed.
    pub fn set_layer(&mut self, layer: Layer, visible: bool) -> bool {
        let flag = match layer {
            Layer::Soldiers => &mut self.config.show_soldiers,
            Layer::Zones => &mut self.config.show_zones,
            Layer::Objectives => &mut self.config.show_objectives,
        };
        let changed = *flag != visible;
        *flag = visible;
        changed
    }

    /// Include or exclude a soldier status. Returns whether the configuration changed.
    pub fn set_status_visible(&mut self, status: SoldierStatus, visible: bool) -> bool {
        if visible {
            self.config.soldier_statuses.insert(status)
        } else {
            self.config.soldier_statuses.remove(&status)
        }
    }

    pub fn visible_entities(&self, store: &EntityStore) -> Vec<TrackedEntity> {
        visible_entities(store, &self.config)
    }
}
