//! Boundary traits for the engine's external collaborators.
//!
//! Any mapping SDK exposing a loaded signal, a construction call, idle/error
//! events, and marker placement is substitutable behind [`MapSdk`]; the data
//! source and navigation sink are similarly narrow. Tests drive the engine
//! with in-memory implementations of these traits.

use crate::core::{
    config::GestureHandling,
    geo::{LatLng, LatLngBounds},
    item::GeoItem,
};
use crate::markers::MarkerDescriptor;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Options handed to the SDK's map constructor
#[derive(Debug, Clone, PartialEq)]
pub struct MapInit {
    pub center: LatLng,
    pub zoom: f64,
    pub gesture_handling: GestureHandling,
    pub restricted_bounds: Option<LatLngBounds>,
}

/// Mapping SDK boundary.
///
/// The SDK loads asynchronously and reports idle/error events; those events
/// are pushed into the [`ViewportLifecycle`](crate::viewport::lifecycle::ViewportLifecycle)
/// by whatever host wires the SDK's callbacks.
#[async_trait]
pub trait MapSdk: Send + Sync {
    /// Resolves once the SDK script has loaded, or errors if loading failed
    async fn ensure_loaded(&self) -> Result<()>;

    /// Constructs the map instance. Called at most once per mounted view.
    fn construct(&self, init: &MapInit) -> Result<()>;

    /// Re-asserts the map center on the live instance
    fn set_center(&self, center: LatLng) -> Result<()>;

    /// Forces the SDK to re-measure its container
    fn trigger_resize(&self);

    /// Replaces the full marker set; prior markers are discarded, never merged
    fn replace_markers(&self, markers: Vec<MarkerDescriptor>) -> Result<()>;

    /// Removes all markers, used on teardown
    fn clear_markers(&self);
}

/// Candidate data boundary.
///
/// Implementations apply the candidate constraints at the query: not
/// soft-deleted, not expired, has coordinates, and either an event or a
/// non-null remaining count. The result is a flat list; the 1 km radius
/// bounds it in practice, so no pagination.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_candidates(&self, now: DateTime<Utc>) -> Result<Vec<GeoItem>>;
}

/// Navigation boundary: go to a path with query parameters
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str, query: &[(String, String)]);
}
