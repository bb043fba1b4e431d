pub mod icon;

use crate::core::{geo::LatLng, item::GeoItem};
use icon::IconDescriptor;

/// Renderable marker derived from one recomputation pass.
///
/// Descriptors are owned by the pass that created them and rebuilt wholesale
/// on the next pass; nothing diffs or merges them.
#[derive(Debug, Clone)]
pub enum MarkerDescriptor {
    Single {
        item: GeoItem,
        icon: IconDescriptor,
    },
    Cluster {
        cell_key: String,
        count: usize,
        position: LatLng,
        /// Shared place name, used for the cluster's feed search link
        place_name: String,
        icon: IconDescriptor,
    },
}

impl MarkerDescriptor {
    pub fn position(&self) -> LatLng {
        match self {
            MarkerDescriptor::Single { item, .. } => item.position,
            MarkerDescriptor::Cluster { position, .. } => *position,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            MarkerDescriptor::Single { item, .. } => &item.title,
            MarkerDescriptor::Cluster { place_name, .. } => place_name,
        }
    }

    pub fn icon(&self) -> &IconDescriptor {
        match self {
            MarkerDescriptor::Single { icon, .. } => icon,
            MarkerDescriptor::Cluster { icon, .. } => icon,
        }
    }
}
