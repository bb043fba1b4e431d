//! Grid-cell clustering of co-located candidate items.
//!
//! Coordinates are rounded to a fixed decimal precision (4 places ≈ 10 m)
//! and bucketed by the resulting cell key, so markers for items at the same
//! storefront collapse into one. O(n) with a hash map; the hash grid is the
//! extension point for a spatial index if candidate sets ever outgrow it.

use crate::core::{geo::LatLng, item::GeoItem};
use crate::prelude::HashMap;

/// 4 decimal places ≈ 10 m cells
pub const DEFAULT_PRECISION_DECIMALS: u32 = 4;

/// Items whose coordinates round to the same grid cell
#[derive(Debug, Clone)]
pub struct LocationGroup {
    pub cell_key: String,
    pub members: Vec<GeoItem>,
}

impl LocationGroup {
    /// Get the number of items in the group
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Check if this is a single-item group
    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }

    /// Position used when the group renders as one marker
    pub fn representative_position(&self) -> LatLng {
        self.members
            .first()
            .map(|item| item.position)
            .unwrap_or_default()
    }
}

fn rounded(value: f64, precision_decimals: u32) -> f64 {
    let scale = 10f64.powi(precision_decimals as i32);
    // + 0.0 folds negative zero into positive zero so keys stay stable
    (value * scale).round() / scale + 0.0
}

/// Cell key for a coordinate at the given precision
pub fn cell_key(position: &LatLng, precision_decimals: u32) -> String {
    let p = precision_decimals as usize;
    format!(
        "{:.p$}:{:.p$}",
        rounded(position.lat, precision_decimals),
        rounded(position.lng, precision_decimals),
        p = p
    )
}

/// Buckets items by rounded coordinate.
///
/// Items with missing or non-finite coordinates are dropped before grouping;
/// every remaining item lands in exactly one group. Output order is
/// deterministic (sorted by cell key).
pub fn cluster(items: Vec<GeoItem>, precision_decimals: u32) -> Vec<LocationGroup> {
    let mut cells: HashMap<String, Vec<GeoItem>> = HashMap::default();

    for item in items {
        if !item.position.is_valid() {
            log::debug!("dropping item {} with invalid coordinates", item.id);
            continue;
        }
        cells
            .entry(cell_key(&item.position, precision_decimals))
            .or_default()
            .push(item);
    }

    let mut groups: Vec<LocationGroup> = cells
        .into_iter()
        .map(|(cell_key, members)| LocationGroup { cell_key, members })
        .collect();
    groups.sort_by(|a, b| a.cell_key.cmp(&b.cell_key));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn item_at(id: &str, lat: f64, lng: f64) -> GeoItem {
        GeoItem::new(id, "test", LatLng::new(lat, lng))
            .with_remaining(2)
            .with_expiry(Utc::now() + Duration::hours(1))
    }

    #[test]
    fn test_every_item_lands_in_exactly_one_group() {
        let items = vec![
            item_at("a", 35.68121, 139.76711),
            item_at("b", 35.68123, 139.76709),
            item_at("c", 35.69000, 139.76711),
        ];

        let groups = cluster(items, DEFAULT_PRECISION_DECIMALS);
        let total: usize = groups.iter().map(|g| g.count()).sum();
        assert_eq!(total, 3);

        let mut seen = std::collections::HashSet::new();
        for group in &groups {
            for member in &group.members {
                assert!(seen.insert(member.id.clone()), "{} appeared twice", member.id);
            }
        }
    }

    #[test]
    fn test_same_rounded_coordinates_share_a_group() {
        // Both round to 35.6812:139.7671
        let items = vec![
            item_at("a", 35.68121, 139.76711),
            item_at("b", 35.68123, 139.76709),
        ];

        let groups = cluster(items, DEFAULT_PRECISION_DECIMALS);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count(), 2);
    }

    #[test]
    fn test_distant_items_never_share_a_group() {
        // More than one grid cell apart in latitude
        let items = vec![
            item_at("a", 35.6812, 139.7671),
            item_at("b", 35.6815, 139.7671),
        ];

        let groups = cluster(items, DEFAULT_PRECISION_DECIMALS);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_invalid_coordinates_are_dropped() {
        let items = vec![
            item_at("ok", 35.6812, 139.7671),
            item_at("nan", f64::NAN, 139.7671),
            item_at("range", 95.0, 139.7671),
        ];

        let groups = cluster(items, DEFAULT_PRECISION_DECIMALS);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members[0].id, "ok");
    }

    #[test]
    fn test_five_colocated_items_form_one_group() {
        let items: Vec<GeoItem> = (0..5)
            .map(|i| item_at(&format!("i{}", i), 35.68120, 139.76710))
            .collect();

        let groups = cluster(items, DEFAULT_PRECISION_DECIMALS);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count(), 5);
        assert!(!groups[0].is_single());
    }

    #[test]
    fn test_negative_zero_rounds_to_stable_key() {
        let a = item_at("a", -0.00001, 0.00001);
        let b = item_at("b", 0.00001, -0.00001);

        let groups = cluster(vec![a, b], DEFAULT_PRECISION_DECIMALS);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].cell_key, "0.0000:0.0000");
    }
}
