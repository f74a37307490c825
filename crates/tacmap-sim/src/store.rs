//! Entity store: canonical in-memory state for every tracked entity.
//!
//! Entities live in a hecs `World` as component bundles; a per-kind index keeps
//! insertion order and id lookup. Reads hand out owned `TrackedEntity` copies,
//! so callers never observe a later mutation through a listing.

use std::collections::HashMap;

use hecs::{Entity, World};

use tacmap_core::components::*;
use tacmap_core::constants::MIN_ZONE_POINTS;
use tacmap_core::entities::*;
use tacmap_core::enums::*;
use tacmap_core::error::TacticalError;
use tacmap_core::types::{Coordinate, EntityRef};

#[derive(Default)]
pub struct EntityStore {
    world: World,
    index: HashMap<EntityRef, Entity>,
    soldiers: Vec<Entity>,
    zones: Vec<Entity>,
    objectives: Vec<Entity>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new soldier. Fails on an invalid position or an existing id.
    pub fn insert_soldier(&mut self, soldier: Soldier) -> Result<(), TacticalError> {
        soldier.position.validate()?;
        let key = EntityRef::soldier(soldier.id.clone());
        self.ensure_absent(&key)?;

        let entity = self.world.spawn((
            Callsign {
                id: soldier.id,
                display_name: soldier.display_name,
                mission_ref: soldier.mission_ref,
            },
            Telemetry {
                position: soldier.position,
                status: soldier.status,
                last_update_ms: soldier.last_update_ms,
                revision: soldier.revision,
            },
        ));
        self.track(key, entity);
        Ok(())
    }

    /// Insert a new operation zone. The boundary needs at least three valid vertices.
    pub fn insert_zone(&mut self, zone: OperationZone) -> Result<(), TacticalError> {
        if zone.boundary.len() < MIN_ZONE_POINTS {
            return Err(TacticalError::InvalidZone {
                id: zone.id,
                points: zone.boundary.len(),
            });
        }
        for point in &zone.boundary {
            point.validate()?;
        }
        let key = EntityRef::zone(zone.id.clone());
        self.ensure_absent(&key)?;

        let entity = self.world.spawn((
            ZoneInfo {
                id: zone.id,
                name: zone.name,
                kind: zone.kind,
                description: zone.description,
            },
            Boundary {
                points: zone.boundary,
            },
        ));
        self.track(key, entity);
        Ok(())
    }

    /// Insert a new mission objective.
    pub fn insert_objective(&mut self, objective: MissionObjective) -> Result<(), TacticalError> {
        objective.position.validate()?;
        let key = EntityRef::objective(objective.id.clone());
        self.ensure_absent(&key)?;

        let entity = self.world.spawn((
            ObjectiveInfo {
                id: objective.id,
                name: objective.name,
                kind: objective.kind,
                status: objective.status,
                description: objective.description,
            },
            Anchor {
                position: objective.position,
            },
        ));
        self.track(key, entity);
        Ok(())
    }

    /// Insert or replace a soldier's position, status and timestamp.
    ///
    /// Identity fields are immutable: an existing soldier keeps its display name
    /// and mission. An unknown id creates a soldier named after its id with no
    /// mission. Returns the resulting record.
    pub fn upsert_soldier(
        &mut self,
        id: &str,
        position: Coordinate,
        status: SoldierStatus,
        timestamp_ms: u64,
    ) -> Result<Soldier, TacticalError> {
        position.validate()?;
        let key = EntityRef::soldier(id);

        match self.index.get(&key).copied() {
            Some(entity) => {
                let telemetry = self
                    .world
                    .query_one_mut::<&mut Telemetry>(entity)
                    .map_err(|_| TacticalError::NotFound {
                        entity: key.clone(),
                    })?;
                *telemetry = Telemetry {
                    position,
                    status,
                    last_update_ms: timestamp_ms,
                    revision: telemetry.revision + 1,
                };
            }
            None => {
                self.insert_soldier(Soldier {
                    id: id.to_string(),
                    display_name: id.to_string(),
                    position,
                    status,
                    mission_ref: String::new(),
                    last_update_ms: timestamp_ms,
                    revision: 0,
                })?;
            }
        }
        self.get_soldier(id)
    }

    /// Rewrite every soldier's telemetry in insertion order.
    ///
    /// `update` receives the current telemetry and returns its full replacement,
    /// so each soldier changes in one step.
    pub fn update_soldiers(&mut self, mut update: impl FnMut(&Callsign, Telemetry) -> Telemetry) {
        for &entity in &self.soldiers {
            if let Ok((callsign, telemetry)) = self
                .world
                .query_one_mut::<(&Callsign, &mut Telemetry)>(entity)
            {
                *telemetry = update(callsign, *telemetry);
            }
        }
    }

    pub fn get_soldier(&self, id: &str) -> Result<Soldier, TacticalError> {
        match self.get(&EntityRef::soldier(id))? {
            TrackedEntity::Soldier(soldier) => Ok(soldier),
            _ => Err(TacticalError::NotFound {
                entity: EntityRef::soldier(id),
            }),
        }
    }

    /// Look up any entity by reference.
    pub fn get(&self, key: &EntityRef) -> Result<TrackedEntity, TacticalError> {
        self.index
            .get(key)
            .and_then(|&entity| self.read(key.kind, entity))
            .ok_or_else(|| TacticalError::NotFound {
                entity: key.clone(),
            })
    }

    pub fn contains(&self, key: &EntityRef) -> bool {
        self.index.contains_key(key)
    }

    /// Snapshot of one kind, in insertion order.
    pub fn list_entities(&self, kind: EntityKind) -> Vec<TrackedEntity> {
        self.order(kind)
            .iter()
            .filter_map(|&entity| self.read(kind, entity))
            .collect()
    }

    /// Snapshot of all soldiers, in insertion order.
    pub fn soldiers(&self) -> Vec<Soldier> {
        self.list_entities(EntityKind::Soldier)
            .into_iter()
            .filter_map(|entity| match entity {
                TrackedEntity::Soldier(soldier) => Some(soldier),
                _ => None,
            })
            .collect()
    }

    /// Remove an entity, returning its last record.
    pub fn remove(&mut self, key: &EntityRef) -> Result<TrackedEntity, TacticalError> {
        let record = self.get(key)?;
        if let Some(entity) = self.index.remove(key) {
            self.order_mut(key.kind).retain(|&e| e != entity);
            let _ = self.world.despawn(entity);
        }
        Ok(record)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.order(kind).len()
    }

    fn ensure_absent(&self, key: &EntityRef) -> Result<(), TacticalError> {
        if self.index.contains_key(key) {
            Err(TacticalError::DuplicateEntity {
                entity: key.clone(),
            })
        } else {
            Ok(())
        }
    }

    fn track(&mut self, key: EntityRef, entity: Entity) {
        self.order_mut(key.kind).push(entity);
        self.index.insert(key, entity);
    }

    fn order(&self, kind: EntityKind) -> &[Entity] {
        match kind {
            EntityKind::Soldier => &self.soldiers,
            EntityKind::Zone => &self.zones,
            EntityKind::Objective => &self.objectives,
        }
    }

    fn order_mut(&mut self, kind: EntityKind) -> &mut Vec<Entity> {
        match kind {
            EntityKind::Soldier => &mut self.soldiers,
            EntityKind::Zone => &mut self.zones,
            EntityKind::Objective => &mut self.objectives,
        }
    }

    /// Assemble an owned record from the entity's components.
    fn read(&self, kind: EntityKind, entity: Entity) -> Option<TrackedEntity> {
        match kind {
            EntityKind::Soldier => {
                let mut query = self.world.query_one::<(&Callsign, &Telemetry)>(entity).ok()?;
                query.get().map(|(callsign, telemetry)| {
                    TrackedEntity::Soldier(Soldier {
                        id: callsign.id.clone(),
                        display_name: callsign.display_name.clone(),
                        position: telemetry.position,
                        status: telemetry.status,
                        mission_ref: callsign.mission_ref.clone(),
                        last_update_ms: telemetry.last_update_ms,
                        revision: telemetry.revision,
                    })
                })
            }
            EntityKind::Zone => {
                let mut query = self.world.query_one::<(&ZoneInfo, &Boundary)>(entity).ok()?;
                query.get().map(|(info, boundary)| {
                    TrackedEntity::Zone(OperationZone {
                        id: info.id.clone(),
                        name: info.name.clone(),
                        boundary: boundary.points.clone(),
                        kind: info.kind,
                        description: info.description.clone(),
                    })
                })
            }
            EntityKind::Objective => {
                let mut query = self
                    .world
                    .query_one::<(&ObjectiveInfo, &Anchor)>(entity)
                    .ok()?;
                query.get().map(|(info, anchor)| {
                    TrackedEntity::Objective(MissionObjective {
                        id: info.id.clone(),
                        name: info.name.clone(),
                        position: anchor.position,
                        kind: info.kind,
                        status: info.status,
                        description: info.description.clone(),
                    })
                })
            }
        }
    }
}
