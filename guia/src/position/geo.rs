//! Great-circle distance between geographic coordinates.

use super::GeoPoint;

/// Mean Earth radius in meters (IUGG value).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points, in meters.
///
/// Accurate to well under a meter at the scales the gatekeeper cares
/// about (tens of meters).
pub fn haversine_distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = GeoPoint::new(-23.5505, -46.6333);
        assert_eq!(haversine_distance_m(p, p), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // One degree of latitude is ~111.2 km everywhere
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let d = haversine_distance_m(a, b);
        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);
    }

    #[test]
    fn test_small_displacement() {
        // ~0.00018 degrees of latitude is ~20 m
        let a = GeoPoint::new(-23.550500, -46.633300);
        let b = GeoPoint::new(-23.550680, -46.633300);
        let d = haversine_distance_m(a, b);
        assert!((d - 20.0).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_symmetric() {
        let a = GeoPoint::new(-18.4696091, -43.4953982);
        let b = GeoPoint::new(-18.4700000, -43.4960000);
        let d_ab = haversine_distance_m(a, b);
        let d_ba = haversine_distance_m(b, a);
        assert!((d_ab - d_ba).abs() < 1e-9);
        assert!(d_ab > 0.0);
    }

    #[test]
    fn test_known_city_pair() {
        // São Paulo (Sé) to Rio de Janeiro (centro): ~357 km
        let sp = GeoPoint::new(-23.5505, -46.6333);
        let rj = GeoPoint::new(-22.9068, -43.1729);
        let d = haversine_distance_m(sp, rj);
        assert!((d - 357_000.0).abs() < 5_000.0, "got {}", d);
    }
}
