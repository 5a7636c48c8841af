//! Geographic primitives: coordinates and great-circle distance.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

const DEG: f64 = PI / 180.0;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let p = Self { latitude, longitude };
        p.is_valid().then_some(p)
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_coords(self.latitude, self.longitude))
    }
}

/// Haversine distance between two points, in kilometres.
///
/// `a` is clamped into `[0, 1]` so rounding near identical or antipodal
/// points never reaches `sqrt` of a negative number.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude * DEG;
    let lat2 = to.latitude * DEG;
    let d_lat = (to.latitude - from.latitude) * DEG;
    let d_lon = (to.longitude - from.longitude) * DEG;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Format coordinates with hemisphere letters, e.g. `12.0464°S, 77.0428°W`.
pub fn format_coords(lat: f64, lon: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", lat.abs(), ns, lon.abs(), ew)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_same_point_is_zero() {
        let lima = pt(-12.0464, -77.0428);
        assert!(haversine_km(lima, lima) < 1e-9);
    }

    #[test]
    fn test_quarter_circle() {
        let d = haversine_km(pt(0.0, 0.0), pt(0.0, 90.0));
        assert_relative_eq!(d, EARTH_RADIUS_KM * PI / 2.0, epsilon = 1e-6);
        assert!((d - 10007.5).abs() < 0.1);
    }

    #[test]
    fn test_antipodal_is_finite() {
        let d = haversine_km(pt(0.0, 0.0), pt(0.0, 180.0));
        assert!(d.is_finite());
        assert_relative_eq!(d, EARTH_RADIUS_KM * PI, epsilon = 1e-6);
    }

    #[test]
    fn test_symmetric() {
        let lima = pt(-12.0464, -77.0428);
        let cusco = pt(-13.5320, -71.9675);
        assert_eq!(haversine_km(lima, cusco), haversine_km(cusco, lima));
    }

    #[test]
    fn test_lima_to_cusco() {
        let d = haversine_km(pt(-12.0464, -77.0428), pt(-13.5320, -71.9675));
        assert!(d > 560.0 && d < 590.0, "got {}", d);
    }

    #[test]
    fn test_validation() {
        assert!(GeoPoint::new(90.0, 180.0).is_some());
        assert!(GeoPoint::new(-90.0, -180.0).is_some());
        assert!(GeoPoint::new(90.1, 0.0).is_none());
        assert!(GeoPoint::new(0.0, -180.5).is_none());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_none());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_format_coords() {
        assert_eq!(format_coords(-12.0464, -77.0428), "12.0464\u{00B0}S, 77.0428\u{00B0}W");
        assert_eq!(format_coords(21.4225, 39.8262), "21.4225\u{00B0}N, 39.8262\u{00B0}E");
    }
}
