//! Map view orchestration.
//!
//! Composes the sampler, permission cache, distance filter, clusterer, and
//! icon synthesizer into the marker recomputation pass, and routes marker
//! clicks to navigation. Each pass works on an explicit input snapshot —
//! position, radius, and the freshly fetched candidate list — so no stage
//! ever reads state that changed under it mid-pass.

use crate::core::{
    config::EngineConfig,
    geo::{filter_within_radius, LatLng},
    item::GeoItem,
};
use crate::markers::{icon::icon_for, MarkerDescriptor};
use crate::permission::{
    cache::PermissionCache,
    sampler::{GeoSampler, PositionProvider, PositionRequest},
};
use crate::spatial::clustering::cluster;
use crate::traits::{ItemSource, MapSdk, Navigator};
use crate::Result;
use chrono::Utc;
use std::sync::Arc;

/// Snapshot of the inputs to one recomputation pass
#[derive(Debug, Clone)]
pub struct RecomputeInput {
    pub origin: LatLng,
    pub radius_meters: f64,
    pub items: Vec<GeoItem>,
}

/// Composes the engine around a live map view.
///
/// All collaborators are injected; nothing here reaches for ambient global
/// state, including the permission grant.
pub struct MapViewOrchestrator {
    config: EngineConfig,
    permission: PermissionCache,
    sampler: GeoSampler,
    source: Arc<dyn ItemSource>,
    sdk: Arc<dyn MapSdk>,
    navigator: Arc<dyn Navigator>,
}

impl MapViewOrchestrator {
    pub fn new(
        config: EngineConfig,
        permission: PermissionCache,
        provider: Arc<dyn PositionProvider>,
        source: Arc<dyn ItemSource>,
        sdk: Arc<dyn MapSdk>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let request = PositionRequest {
            timeout: config.position_timeout,
            ..Default::default()
        };
        Self {
            sampler: GeoSampler::with_request(provider, request),
            config,
            permission,
            source,
            sdk,
            navigator,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolves the user's position, honoring the permission window.
    ///
    /// A sample while no grant is active rides on the native prompt; its
    /// success means the user just said yes, so a fresh grant is written.
    /// A sample inside an active window never touches the expiry — only an
    /// explicit extend does.
    pub async fn acquire_position(&self) -> Result<LatLng> {
        let status = self.permission.check();
        if status.is_granted {
            log::debug!(
                "permission window active, {} minutes remaining",
                status.remaining_minutes
            );
        }

        let position = self.sampler.sample().await?;

        if !status.is_granted {
            self.permission
                .grant(self.config.permission_window_minutes)?;
        }
        Ok(position)
    }

    /// One full recomputation pass: fetch → filter → cluster → icons →
    /// replace markers. Runs when position and readiness are first
    /// satisfied; panning and zooming never re-trigger it, the radius is
    /// anchored to the user's position, not the viewport.
    ///
    /// A failed candidate fetch degrades to an empty marker set; the map
    /// itself stays alive.
    pub async fn refresh(&self, origin: LatLng) -> Result<Vec<MarkerDescriptor>> {
        let items = match self.source.fetch_candidates(Utc::now()).await {
            Ok(items) => items,
            Err(e) => {
                log::warn!("candidate fetch failed, rendering empty map: {}", e);
                self.sdk.replace_markers(Vec::new())?;
                return Ok(Vec::new());
            }
        };

        let input = RecomputeInput {
            origin,
            radius_meters: self.config.map_radius_meters,
            items,
        };

        let markers = self.compute_markers(input);
        log::info!("rendering {} markers", markers.len());
        self.sdk.replace_markers(markers.clone())?;
        Ok(markers)
    }

    /// Pure pass over an input snapshot
    pub fn compute_markers(&self, input: RecomputeInput) -> Vec<MarkerDescriptor> {
        let now = Utc::now();
        debug_assert!(
            input.items.iter().all(|item| item.is_displayable(now)),
            "candidate constraints must be applied at the source query"
        );

        let nearby = filter_within_radius(&input.origin, input.items, input.radius_meters);
        let groups = cluster(nearby, self.config.cluster_precision_decimals);

        groups
            .into_iter()
            .map(|group| {
                let icon = icon_for(&group);
                if group.is_single() {
                    let mut members = group.members;
                    MarkerDescriptor::Single {
                        item: members.remove(0),
                        icon,
                    }
                } else {
                    let position = group.representative_position();
                    let place_name = group.members[0].title.clone();
                    MarkerDescriptor::Cluster {
                        cell_key: group.cell_key,
                        count: group.members.len(),
                        position,
                        place_name,
                        icon,
                    }
                }
            })
            .collect()
    }

    /// The feed's "nearby" search mode shares the filter but not the radius
    pub fn nearby_feed_items(&self, origin: &LatLng, items: Vec<GeoItem>) -> Vec<GeoItem> {
        filter_within_radius(origin, items, self.config.feed_radius_meters)
    }

    /// Routes a marker click: single markers open the feed scoped to the
    /// item, cluster markers open it scoped to a place-name search.
    pub fn on_marker_click(&self, marker: &MarkerDescriptor) {
        match marker {
            MarkerDescriptor::Single { item, .. } => {
                self.navigator
                    .navigate("/feed", &[("post".to_string(), item.id.clone())]);
            }
            MarkerDescriptor::Cluster { place_name, .. } => {
                self.navigator
                    .navigate("/feed", &[("q".to_string(), place_name.clone())]);
            }
        }
    }
}
