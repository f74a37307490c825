//! End-to-end: a seeded scenario with the telemetry feed running drives the
//! grid surface through several ticks.

use tacmap_sim::core::entities::Soldier;
use tacmap_sim::core::enums::{SoldierStatus, SurfaceReadiness};
use tacmap_sim::core::types::{Coordinate, EntityRef};
use tacmap_sim::map_sync::MarkerGeometry;
use tacmap_sim::seed::SeedData;
use tacmap_sim::surface::{GridBounds, GridSurface};
use tacmap_sim::{EngineConfig, TacticalEngine};

const MAX_DRIFT_DEG: f64 = 0.001;

fn three_soldier_seed() -> SeedData {
    let soldier = |id: &str, latitude: f64, longitude: f64| Soldier {
        id: id.into(),
        display_name: format!("Unit {id}"),
        position: Coordinate {
            latitude,
            longitude,
        },
        status: SoldierStatus::Active,
        mission_ref: "Patrol".into(),
        last_update_ms: 0,
        revision: 0,
    };
    SeedData {
        soldiers: vec![
            soldier("S1", 48.8566, 2.3522),
            soldier("S2", 48.8576, 2.3532),
            soldier("S3", 48.8556, 2.3512),
        ],
        ..Default::default()
    }
}

#[test]
fn five_ticks_move_every_soldier_within_bounds() {
    let seed = three_soldier_seed();
    let bounds = GridBounds::around(&seed.coordinates(), 0.01).unwrap();
    let initial = seed.soldiers.clone();

    let mut engine = TacticalEngine::new(
        EngineConfig {
            seed: 7,
            tick_interval_ms: 5000,
            jitter_deg: 0.0002,
            real_time: true,
        },
        GridSurface::with_bounds(bounds),
    )
    .unwrap();
    engine.load_seed(seed).unwrap();

    for tick in 1..=5u64 {
        assert_eq!(engine.advance(5000), 1);

        let soldiers = engine.store().soldiers();
        assert_eq!(soldiers.len(), 3);
        for (start, now) in initial.iter().zip(&soldiers) {
            assert_eq!(now.id, start.id);
            assert_eq!(now.last_update_ms, tick * 5000);
            assert!(
                (now.position.latitude - start.position.latitude).abs() <= MAX_DRIFT_DEG + 1e-9,
                "{} drifted to {}",
                now.id,
                now.position
            );
            assert!(
                (now.position.longitude - start.position.longitude).abs()
                    <= MAX_DRIFT_DEG + 1e-9,
                "{} drifted to {}",
                now.id,
                now.position
            );

            let handle = engine
                .adapter()
                .handle_for(&EntityRef::soldier(now.id.as_str()))
                .unwrap();
            let marker = engine.adapter().surface().marker(handle).unwrap();
            assert_eq!(marker.geometry, MarkerGeometry::Point(now.position));
        }
    }

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.time.tick, 5);
    assert_eq!(snapshot.map.readiness, SurfaceReadiness::Synced);
    assert_eq!(snapshot.map.markers, 3);
    assert_eq!(engine.adapter().surface().ops().created, 3);
}
