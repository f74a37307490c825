//! Seed data: the entities present at engine start.
//!
//! The built-in demo reproduces the Paris training scenario: three units of a
//! reconnaissance detachment, one secured zone and two objectives.

use serde::{Deserialize, Serialize};

use tacmap_core::entities::*;
use tacmap_core::enums::*;
use tacmap_core::error::TacticalError;
use tacmap_core::types::Coordinate;

use crate::store::EntityStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub soldiers: Vec<Soldier>,
    #[serde(default)]
    pub zones: Vec<OperationZone>,
    #[serde(default)]
    pub objectives: Vec<MissionObjective>,
}

impl SeedData {
    pub fn from_json(json: &str) -> Result<Self, TacticalError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Every coordinate in the seed, for fitting a viewport.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.soldiers
            .iter()
            .map(|s| s.position)
            .chain(self.zones.iter().flat_map(|z| z.boundary.iter().copied()))
            .chain(self.objectives.iter().map(|o| o.position))
            .collect()
    }

    /// Build a store from the seed. All records are validated before any is
    /// inserted, so a bad seed leaves nothing behind.
    pub fn into_store(self) -> Result<EntityStore, TacticalError> {
        let mut store = EntityStore::new();
        for soldier in self.soldiers {
            store.insert_soldier(soldier)?;
        }
        for zone in self.zones {
            store.insert_zone(zone)?;
        }
        for objective in self.objectives {
            store.insert_objective(objective)?;
        }
        Ok(store)
    }

    pub fn demo() -> Self {
        Self {
            soldiers: vec![
                soldier("S001", "Alpha Team Leader", 48.8566, 2.3522, SoldierStatus::Active, "Reconnaissance"),
                soldier("S002", "Bravo Sniper", 48.8576, 2.3532, SoldierStatus::Alert, "Overwatch"),
                soldier("S003", "Charlie Medic", 48.8556, 2.3512, SoldierStatus::Offline, "Support"),
            ],
            zones: vec![OperationZone {
                id: "Z001".into(),
                name: "Zone Alpha".into(),
                boundary: vec![
                    point(48.8560, 2.3520),
                    point(48.8570, 2.3520),
                    point(48.8570, 2.3530),
                    point(48.8560, 2.3530),
                ],
                kind: ZoneKind::Secure,
                description: "Secured zone".into(),
            }],
            objectives: vec![
                MissionObjective {
                    id: "O001".into(),
                    name: "Checkpoint Alpha".into(),
                    position: point(48.8566, 2.3522),
                    kind: ObjectiveKind::Primary,
                    status: ObjectiveStatus::InProgress,
                    description: "Secure the checkpoint".into(),
                },
                MissionObjective {
                    id: "O002".into(),
                    name: "Intel Collection".into(),
                    position: point(48.8576, 2.3532),
                    kind: ObjectiveKind::Intel,
                    status: ObjectiveStatus::Pending,
                    description: "Recover the documents".into(),
                },
            ],
        }
    }
}

fn point(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate {
        latitude,
        longitude,
    }
}

fn soldier(
    id: &str,
    name: &str,
    latitude: f64,
    longitude: f64,
    status: SoldierStatus,
    mission: &str,
) -> Soldier {
    Soldier {
        id: id.into(),
        display_name: name.into(),
        position: point(latitude, longitude),
        status,
        mission_ref: mission.into(),
        last_update_ms: 0,
        revision: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_seed_loads() {
        let store = SeedData::demo().into_store().unwrap();
        assert_eq!(store.count(EntityKind::Soldier), 3);
        assert_eq!(store.count(EntityKind::Zone), 1);
        assert_eq!(store.count(EntityKind::Objective), 2);
        assert_eq!(store.get_soldier("S002").unwrap().display_name, "Bravo Sniper");
    }

    #[test]
    fn test_seed_from_json() {
        let json = r#"{
            "soldiers": [{
                "id": "S1", "display_name": "Lead",
                "position": {"latitude": 10.0, "longitude": 10.0},
                "status": "active", "mission_ref": "Patrol"
            }],
            "objectives": [{
                "id": "O1", "name": "Bridge",
                "position": {"latitude": 10.1, "longitude": 10.1},
                "kind": "secondary", "status": "in_progress"
            }]
        }"#;
        let seed = SeedData::from_json(json).unwrap();
        assert_eq!(seed.soldiers.len(), 1);
        assert!(seed.zones.is_empty());
        assert_eq!(seed.objectives[0].status, ObjectiveStatus::InProgress);
        assert_eq!(seed.coordinates().len(), 2);
    }

    #[test]
    fn test_malformed_json_is_seed_error() {
        assert!(matches!(
            SeedData::from_json("{ not json"),
            Err(TacticalError::Seed(_))
        ));
    }

    #[test]
    fn test_invalid_seed_is_rejected() {
        let mut seed = SeedData::demo();
        seed.objectives[1].position.latitude = 120.0;
        assert!(matches!(
            seed.into_store(),
            Err(TacticalError::InvalidCoordinate { .. })
        ));
    }
}
