use crate::core::item::GeoItem;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, used by the haversine distance
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are finite and within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat >= -90.0
            && self.lat <= 90.0
            && self.lng >= -180.0
            && self.lng <= 180.0
    }

    /// Calculates the distance in meters to another LatLng using the
    /// Haversine formula
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        haversine_meters(self, other)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Great-circle distance in meters between two coordinates.
///
/// Distances are meters everywhere inside the engine; kilometer conversion
/// happens only at display boundaries.
pub fn haversine_meters(a: &LatLng, b: &LatLng) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Keeps the items whose coordinate lies within `radius_meters` of `origin`.
///
/// The radius is caller-supplied; the map ring and the feed "nearby" search
/// use different values from [`EngineConfig`](crate::core::config::EngineConfig).
pub fn filter_within_radius(
    origin: &LatLng,
    items: Vec<GeoItem>,
    radius_meters: f64,
) -> Vec<GeoItem> {
    items
        .into_iter()
        .filter(|item| haversine_meters(origin, &item.position) <= radius_meters)
        .collect()
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn item_at(id: &str, lat: f64, lng: f64) -> GeoItem {
        GeoItem::new(id, "test", LatLng::new(lat, lng))
            .with_remaining(3)
            .with_expiry(Utc::now() + Duration::hours(1))
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let here = LatLng::new(35.6812, 139.7671);
        assert_eq!(haversine_meters(&here, &here), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = LatLng::new(35.6812, 139.7671);
        let b = LatLng::new(35.6586, 139.7454);
        assert_eq!(haversine_meters(&a, &b), haversine_meters(&b, &a));
    }

    #[test]
    fn test_known_meridian_distance() {
        // 0.009 degrees of latitude is almost exactly 1km along a meridian
        let a = LatLng::new(35.0, 139.0);
        let b = LatLng::new(35.009, 139.0);
        let distance = haversine_meters(&a, &b);
        let expected = 1_000.7;
        assert!((distance - expected).abs() / expected < 0.01);
    }

    #[test]
    fn test_city_pair_distance() {
        let tokyo = LatLng::new(35.6812, 139.7671);
        let osaka = LatLng::new(34.7025, 135.4959);
        let distance = haversine_meters(&tokyo, &osaka);

        // Tokyo Station to Osaka Station is roughly 403 km
        assert!((distance - 403_000.0).abs() < 5_000.0);
    }

    #[test]
    fn test_filter_keeps_only_items_in_radius() {
        let origin = LatLng::new(35.68, 139.76);
        let items = vec![
            item_at("near", 35.6805, 139.76),   // ~55m
            item_at("edge", 35.6885, 139.76),   // ~945m
            item_at("far", 35.7000, 139.76),    // ~2.2km
        ];

        let kept = filter_within_radius(&origin, items, 1_000.0);
        let ids: Vec<&str> = kept.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "edge"]);
    }

    #[test]
    fn test_filter_is_monotonic_in_radius() {
        let origin = LatLng::new(35.68, 139.76);
        let items = vec![
            item_at("a", 35.6805, 139.76),
            item_at("b", 35.6885, 139.76),
            item_at("c", 35.7000, 139.76),
            item_at("d", 35.7200, 139.76),
        ];

        let narrow = filter_within_radius(&origin, items.clone(), 1_000.0);
        let wide = filter_within_radius(&origin, items, 5_000.0);

        assert!(wide.len() >= narrow.len());
        for item in &narrow {
            assert!(wide.iter().any(|w| w.id == item.id));
        }
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(LatLng::new(35.68, 139.76).is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
        assert!(!LatLng::new(0.0, 181.0).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_bounds_contains() {
        let japan = LatLngBounds::from_coords(20.0, 122.0, 46.0, 154.0);
        assert!(japan.contains(&LatLng::new(35.68, 139.76)));
        assert!(!japan.contains(&LatLng::new(51.5, -0.12)));
    }
}
