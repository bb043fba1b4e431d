//! # Proxmap
//!
//! Proximity visibility and clustering engine for a map-based local-deals
//! surface: time-boxed geolocation permission, great-circle radius filtering,
//! grid-cell clustering, on-the-fly marker icon synthesis, and a resilient
//! viewport initialization lifecycle around an asynchronously loading
//! third-party mapping SDK.
//!
//! The actual SDK, geolocation hardware, persisted storage, candidate data
//! source, and navigation sink are collaborators behind the traits in
//! [`traits`] and [`permission`], so the engine runs identically against a
//! real map and against in-memory fakes.

pub mod core;
pub mod markers;
pub mod orchestrator;
pub mod permission;
pub mod prelude;
pub mod spatial;
pub mod traits;
pub mod viewport;

// Re-export public API
pub use crate::core::{
    config::{BrowserEngine, BrowserProfile, EngineConfig, GestureHandling, InitOptions},
    geo::{filter_within_radius, haversine_meters, LatLng, LatLngBounds},
    item::{Category, GeoItem},
};

pub use markers::{
    icon::{icon_for, IconDescriptor},
    MarkerDescriptor,
};

pub use orchestrator::{MapViewOrchestrator, RecomputeInput};

pub use permission::{
    cache::{GrantStore, PermissionCache, PermissionGrant, PermissionStatus},
    sampler::{GeoError, GeoSampler, PositionProvider, PositionRequest},
};

pub use spatial::clustering::{cluster, LocationGroup};

pub use traits::{ItemSource, MapInit, MapSdk, Navigator};

pub use viewport::lifecycle::{LifecyclePhase, ViewportLifecycle};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, EngineError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("location access failed: {0}")]
    Permission(#[from] permission::sampler::GeoError),

    #[error("map SDK failed to load: {0}")]
    SdkLoad(String),

    #[error("map initialization timed out after {waited_secs}s")]
    InitializationTimeout { waited_secs: u64 },

    #[error("map construction failed: {0}")]
    Construction(String),

    #[error("candidate fetch failed: {0}")]
    DataFetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = EngineError;
