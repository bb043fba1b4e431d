use crate::core::geo::LatLng;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Deal verticals a candidate item can belong to.
///
/// Unknown wire values deserialize to `None` on [`GeoItem::category`] rather
/// than failing the whole fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Event,
    Gourmet,
    Retail,
    Service,
}

impl Category {
    /// Unit suffix shown in remaining-count badges
    pub fn count_unit(&self) -> &'static str {
        match self {
            Category::Event => "枠",
            Category::Gourmet => "席",
            Category::Retail => "個",
            Category::Service => "枠",
        }
    }
}

/// A geotagged point-of-interest candidate for map display.
///
/// Items are fetched fresh on every recomputation pass and never mutated in
/// place; a new pass replaces the whole working set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoItem {
    pub id: String,
    #[serde(default)]
    pub category: Option<Category>,
    pub title: String,
    pub position: LatLng,
    #[serde(default)]
    pub remaining_count: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl GeoItem {
    /// Creates an item expiring 24 hours from now
    pub fn new(id: impl Into<String>, title: impl Into<String>, position: LatLng) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            category: None,
            title: title.into(),
            position,
            remaining_count: None,
            created_at: now,
            expires_at: now + Duration::hours(24),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_remaining(mut self, count: u32) -> Self {
        self.remaining_count = Some(count);
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn is_event(&self) -> bool {
        self.category == Some(Category::Event)
    }

    /// Display eligibility: not yet expired, and either an event or a deal
    /// with a remaining count. Non-event items without a count are never
    /// shown on the map.
    pub fn is_displayable(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at && (self.is_event() || self.remaining_count.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_without_count_is_displayable() {
        let item = GeoItem::new("e1", "flea market", LatLng::new(35.68, 139.76))
            .with_category(Category::Event);
        assert!(item.remaining_count.is_none());
        assert!(item.is_displayable(Utc::now()));
    }

    #[test]
    fn test_non_event_without_count_is_not_displayable() {
        let item = GeoItem::new("d1", "lunch set", LatLng::new(35.68, 139.76))
            .with_category(Category::Gourmet);
        assert!(!item.is_displayable(Utc::now()));
    }

    #[test]
    fn test_expired_item_is_not_displayable() {
        let now = Utc::now();
        let item = GeoItem::new("d2", "last call", LatLng::new(35.68, 139.76))
            .with_remaining(2)
            .with_expiry(now - Duration::minutes(1));
        assert!(!item.is_displayable(now));
    }

    #[test]
    fn test_count_units_by_category() {
        assert_eq!(Category::Gourmet.count_unit(), "席");
        assert_eq!(Category::Retail.count_unit(), "個");
        assert_eq!(Category::Service.count_unit(), "枠");
    }
}
