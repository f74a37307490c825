//! Geodesic math on a spherical Earth.
//!
//! Inputs are assumed valid; out-of-range coordinates yield a defined but
//! meaningless result, so callers validate upstream.

use crate::constants::EARTH_RADIUS_KM;
use crate::types::Coordinate;

/// Great-circle distance between two coordinates using the haversine formula.
/// Returns kilometers.
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Sum of leg distances over consecutive points. Zero for fewer than two points.
pub fn path_length_km(points: &[Coordinate]) -> f64 {
    points
        .windows(2)
        .map(|leg| distance_km(&leg[0], &leg[1]))
        .sum()
}

/// Initial bearing (forward azimuth) from `a` to `b`.
/// Returns degrees in [0, 360), clockwise from north.
pub fn initial_bearing_deg(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let x = delta_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    x.atan2(y).to_degrees().rem_euclid(360.0)
}

/// Arithmetic centroid of a vertex list (good enough for small zones).
pub fn centroid(points: &[Coordinate]) -> Option<Coordinate> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lon) = points.iter().fold((0.0, 0.0), |(lat, lon), p| {
        (lat + p.latitude, lon + p.longitude)
    });
    Some(Coordinate {
        latitude: lat / n,
        longitude: lon / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate {
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        // 1° of arc = 6371 * pi / 180 ≈ 111.195 km
        let d = distance_km(&coord(0.0, 0.0), &coord(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_distance_paris_london() {
        let paris = coord(48.8566, 2.3522);
        let london = coord(51.5074, -0.1278);
        let d = distance_km(&paris, &london);
        assert!((d - 343.5).abs() < 1.0, "Paris-London should be ~343.5 km, got {d}");
    }

    #[test]
    fn test_distance_antipodal_is_half_circumference() {
        let d = distance_km(&coord(0.0, 0.0), &coord(0.0, 180.0));
        let expected = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - expected).abs() < 1e-6, "got {d}, expected {expected}");
    }

    #[test]
    fn test_path_length_edge_cases() {
        let p = coord(48.8566, 2.3522);
        let q = coord(48.8576, 2.3532);
        assert_eq!(path_length_km(&[]), 0.0);
        assert_eq!(path_length_km(&[p]), 0.0);
        assert_eq!(path_length_km(&[p, q]), distance_km(&p, &q));
    }

    #[test]
    fn test_path_length_sums_legs() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 1.0);
        let c = coord(1.0, 1.0);
        let expected = distance_km(&a, &b) + distance_km(&b, &c);
        assert!((path_length_km(&[a, b, c]) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = coord(0.0, 0.0);
        assert!(initial_bearing_deg(&origin, &coord(1.0, 0.0)).abs() < 1e-9);
        assert!((initial_bearing_deg(&origin, &coord(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((initial_bearing_deg(&origin, &coord(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((initial_bearing_deg(&origin, &coord(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_centroid_of_square() {
        let square = [
            coord(48.8560, 2.3520),
            coord(48.8570, 2.3520),
            coord(48.8570, 2.3530),
            coord(48.8560, 2.3530),
        ];
        let c = centroid(&square).unwrap();
        assert!((c.latitude - 48.8565).abs() < 1e-9);
        assert!((c.longitude - 2.3525).abs() < 1e-9);
        assert!(centroid(&[]).is_none());
    }

    fn valid_coord() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| coord(lat, lon))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2000))]

        #[test]
        fn prop_distance_to_self_is_zero(a in valid_coord()) {
            prop_assert!(distance_km(&a, &a).abs() < 1e-9);
        }

        #[test]
        fn prop_distance_is_symmetric(a in valid_coord(), b in valid_coord()) {
            let ab = distance_km(&a, &b);
            let ba = distance_km(&b, &a);
            prop_assert!((ab - ba).abs() < 1e-6, "ab={ab} ba={ba}");
        }

        #[test]
        fn prop_distance_is_bounded(a in valid_coord(), b in valid_coord()) {
            let d = distance_km(&a, &b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }

        /// Points on a meridian are on one great circle; B between A and C.
        #[test]
        fn prop_meridian_points_are_additive(
            lon in -180.0f64..=180.0,
            lat_a in -80.0f64..0.0,
            step_ab in 0.0f64..40.0,
            step_bc in 0.0f64..40.0,
        ) {
            let a = coord(lat_a, lon);
            let b = coord(lat_a + step_ab, lon);
            let c = coord(lat_a + step_ab + step_bc, lon);
            let direct = distance_km(&a, &c);
            let via_b = distance_km(&a, &b) + distance_km(&b, &c);
            prop_assert!((direct - via_b).abs() < 1e-6, "direct={direct} via_b={via_b}");
        }

        /// Points on the equator are on one great circle as long as the arc stays under 180°.
        #[test]
        fn prop_equator_points_are_additive(
            lon_a in -180.0f64..0.0,
            step_ab in 0.0f64..80.0,
            step_bc in 0.0f64..80.0,
        ) {
            let a = coord(0.0, lon_a);
            let b = coord(0.0, lon_a + step_ab);
            let c = coord(0.0, lon_a + step_ab + step_bc);
            let direct = distance_km(&a, &c);
            let via_b = distance_km(&a, &b) + distance_km(&b, &c);
            prop_assert!((direct - via_b).abs() < 1e-6, "direct={direct} via_b={via_b}");
        }
    }
}
