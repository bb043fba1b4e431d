//! Prelude module for common proxmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use proxmap::prelude::*;`

pub use crate::core::{
    config::{BrowserEngine, BrowserProfile, EngineConfig, GestureHandling, InitOptions},
    geo::{filter_within_radius, haversine_meters, LatLng, LatLngBounds},
    item::{Category, GeoItem},
};

pub use crate::markers::{
    icon::{icon_for, IconDescriptor},
    MarkerDescriptor,
};

pub use crate::orchestrator::{MapViewOrchestrator, RecomputeInput};

pub use crate::permission::{
    cache::{
        GrantStore, JsonGrantStore, MemoryGrantStore, PermissionCache, PermissionGrant,
        PermissionStatus,
    },
    sampler::{GeoError, GeoSampler, PositionProvider, PositionRequest},
};

pub use crate::spatial::clustering::{cell_key, cluster, LocationGroup};

pub use crate::traits::{ItemSource, MapInit, MapSdk, Navigator};

pub use crate::viewport::lifecycle::{LifecyclePhase, ViewportLifecycle};

pub use crate::{Error as EngineError, Result};

pub use std::{
    sync::Arc,
    time::Duration,
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
