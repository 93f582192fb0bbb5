//! Spherical-approximation geometry over recorded fixes.

use crate::fix::Fix;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two fixes in km, by the haversine formula.
///
/// Symmetric in its arguments; exactly zero for identical coordinates.
pub fn haversine_distance_km(a: &Fix, b: &Fix) -> f64 {
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude().to_radians().cos()
            * b.latitude().to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Area in km² enclosed by the path treated as a closed ring (the last fix
/// implicitly connects back to the first). Zero for fewer than three fixes.
///
/// Each fix is projected onto a local plane (x = R·lon·cos(lat), y = R·lat)
/// and the shoelace formula applied to the projected polygon. Projection
/// distortion grows with the path's geographic extent and latitude, so the
/// result is an approximation for small areas, not a spherical polygon area.
pub fn enclosed_area_km2(path: &[Fix]) -> f64 {
    if path.len() < 3 {
        return 0.0;
    }

    let mut doubled_area = 0.0;
    for i in 0..path.len() {
        let a = &path[i];
        let b = &path[(i + 1) % path.len()];

        let lat1 = a.latitude().to_radians();
        let lat2 = b.latitude().to_radians();

        let x1 = EARTH_RADIUS_KM * a.longitude().to_radians() * lat1.cos();
        let y1 = EARTH_RADIUS_KM * lat1;
        let x2 = EARTH_RADIUS_KM * b.longitude().to_radians() * lat2.cos();
        let y2 = EARTH_RADIUS_KM * lat2;

        doubled_area += x1 * y2 - x2 * y1;
    }

    (doubled_area / 2.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Utc};

    fn fix(latitude: f64, longitude: f64) -> Fix {
        Fix::new(latitude, longitude, DateTime::<Utc>::from_timestamp(0, 0).unwrap(), None)
    }

    #[test]
    fn distance_is_zero_for_identical_points() {
        let a = fix(40.0, -74.0);
        assert_eq!(haversine_distance_km(&a, &a.clone()), 0.0);
    }

    #[test]
    fn distance_is_symmetric_and_non_negative() {
        let a = fix(56.1629, 10.2039);
        let b = fix(55.6761, 12.5683);
        let d_ab = haversine_distance_km(&a, &b);
        let d_ba = haversine_distance_km(&b, &a);
        assert!(d_ab > 0.0);
        assert_eq!(d_ab, d_ba);
    }

    #[test]
    fn one_millidegree_of_latitude_is_about_111_meters() {
        let a = fix(40.0, -74.0);
        let b = fix(40.001, -74.0);
        assert_relative_eq!(haversine_distance_km(&a, &b), 0.111, max_relative = 0.01);
    }

    #[test]
    fn short_paths_have_zero_area() {
        assert_eq!(enclosed_area_km2(&[]), 0.0);
        assert_eq!(enclosed_area_km2(&[fix(40.0, -74.0)]), 0.0);
        assert_eq!(enclosed_area_km2(&[fix(40.0, -74.0), fix(40.001, -74.0)]), 0.0);
    }

    #[test]
    fn right_triangle_with_1km_legs_encloses_half_a_square_km() {
        // Legs of ~1 km along the meridian and the equator.
        let one_km_deg = 1.0 / (EARTH_RADIUS_KM * std::f64::consts::PI / 180.0);
        let path = [fix(0.0, 0.0), fix(one_km_deg, 0.0), fix(0.0, one_km_deg)];
        assert_relative_eq!(enclosed_area_km2(&path), 0.5, max_relative = 0.01);
    }

    #[test]
    fn ring_orientation_does_not_flip_the_sign() {
        let one_km_deg = 1.0 / (EARTH_RADIUS_KM * std::f64::consts::PI / 180.0);
        let clockwise = [fix(0.0, 0.0), fix(0.0, one_km_deg), fix(one_km_deg, 0.0)];
        let counter = [fix(0.0, 0.0), fix(one_km_deg, 0.0), fix(0.0, one_km_deg)];
        assert_relative_eq!(
            enclosed_area_km2(&clockwise),
            enclosed_area_km2(&counter),
            max_relative = 1e-12
        );
    }
}
