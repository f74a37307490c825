//! Simulated telemetry: random-walk jitter on soldier positions.
//!
//! Stands in for a live feed. Each tick moves every soldier by a uniform delta
//! in `[-jitter, +jitter]` per axis, clamps into the legal coordinate range and
//! refreshes the telemetry timestamp.

use rand::Rng;

use tacmap_core::components::Telemetry;
use tacmap_core::constants::MAX_JITTER_DEG;

use crate::store::EntityStore;

/// Jitter every soldier once. `jitter_deg` is capped at `MAX_JITTER_DEG`.
pub fn run<R: Rng>(store: &mut EntityStore, rng: &mut R, jitter_deg: f64, now_ms: u64) {
    let jitter = jitter_deg.clamp(0.0, MAX_JITTER_DEG);

    store.update_soldiers(|_callsign, telemetry| {
        let (d_lat, d_lon) = if jitter > 0.0 {
            (
                rng.gen_range(-jitter..=jitter),
                rng.gen_range(-jitter..=jitter),
            )
        } else {
            (0.0, 0.0)
        };
        Telemetry {
            position: telemetry.position.offset(d_lat, d_lon),
            status: telemetry.status,
            last_update_ms: now_ms,
            revision: telemetry.revision + 1,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tacmap_core::entities::Soldier;
    use tacmap_core::enums::SoldierStatus;
    use tacmap_core::types::Coordinate;

    fn store_with(positions: &[(f64, f64)]) -> EntityStore {
        let mut store = EntityStore::new();
        for (i, &(latitude, longitude)) in positions.iter().enumerate() {
            store
                .insert_soldier(Soldier {
                    id: format!("S{i}"),
                    display_name: format!("Unit {i}"),
                    position: Coordinate {
                        latitude,
                        longitude,
                    },
                    status: SoldierStatus::Active,
                    mission_ref: String::new(),
                    last_update_ms: 0,
                    revision: 0,
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn test_jitter_stays_within_bound() {
        let mut store = store_with(&[(48.8566, 2.3522), (0.0, 0.0)]);
        let before = store.soldiers();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        run(&mut store, &mut rng, 0.0005, 5000);

        for (old, new) in before.iter().zip(store.soldiers()) {
            assert!((new.position.latitude - old.position.latitude).abs() <= 0.0005 + 1e-12);
            assert!((new.position.longitude - old.position.longitude).abs() <= 0.0005 + 1e-12);
            assert_ne!(new.position, old.position);
            assert_eq!(new.last_update_ms, 5000);
            assert_eq!(new.revision, 1);
            assert_eq!(new.status, old.status);
        }
    }

    #[test]
    fn test_jitter_is_capped() {
        let mut store = store_with(&[(10.0, 10.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            let before = store.get_soldier("S0").unwrap().position;
            run(&mut store, &mut rng, 5.0, 0);
            let after = store.get_soldier("S0").unwrap().position;
            assert!((after.latitude - before.latitude).abs() <= MAX_JITTER_DEG + 1e-12);
            assert!((after.longitude - before.longitude).abs() <= MAX_JITTER_DEG + 1e-12);
        }
    }

    #[test]
    fn test_clamps_at_the_poles_and_antimeridian() {
        let mut store = store_with(&[(90.0, 180.0), (-90.0, -180.0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for tick in 1..=200 {
            run(&mut store, &mut rng, MAX_JITTER_DEG, tick);
            for soldier in store.soldiers() {
                assert!(soldier.position.is_valid(), "{:?}", soldier.position);
            }
        }
    }

    #[test]
    fn test_same_seed_same_walk() {
        let mut a = store_with(&[(1.0, 1.0), (2.0, 2.0)]);
        let mut b = store_with(&[(1.0, 1.0), (2.0, 2.0)]);
        let mut rng_a = ChaCha8Rng::seed_from_u64(12345);
        let mut rng_b = ChaCha8Rng::seed_from_u64(12345);
        for tick in 0..20 {
            run(&mut a, &mut rng_a, 0.0005, tick);
            run(&mut b, &mut rng_b, 0.0005, tick);
        }
        assert_eq!(a.soldiers(), b.soldiers());
    }
}
