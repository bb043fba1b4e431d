//! Configuration for radius rings, clustering precision, permission windows,
//! and per-browser viewport tuning.
//!
//! Browser differences are resolved exactly once, through the
//! [`BrowserProfile::init_options`] table; the lifecycle state machine itself
//! stays browser-agnostic.

use crate::core::geo::{LatLng, LatLngBounds};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Service area the map is restricted to
static SERVICE_BOUNDS: Lazy<LatLngBounds> =
    Lazy::new(|| LatLngBounds::from_coords(20.0, 122.0, 46.0, 154.0));

/// Engine-wide tuning knobs.
///
/// The map ring and the feed "nearby" search radii serve different product
/// surfaces and are deliberately separate values.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Radius of the "what's visible near me" map ring, in meters
    pub map_radius_meters: f64,
    /// Radius of the feed's "nearby" search mode, in meters
    pub feed_radius_meters: f64,
    /// Decimal places coordinates are rounded to when clustering (4 ≈ 10 m)
    pub cluster_precision_decimals: u32,
    /// Validity window written by a permission grant, in minutes
    pub permission_window_minutes: i64,
    /// Platform timeout for a single geolocation request
    pub position_timeout: Duration,
    /// How long the viewport lifecycle waits for the SDK to reach idle
    pub init_timeout: Duration,
    /// Minimum measured container height before map construction is attempted
    pub min_container_height_px: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            map_radius_meters: 1_000.0,
            feed_radius_meters: 5_000.0,
            cluster_precision_decimals: 4,
            permission_window_minutes: 60,
            position_timeout: Duration::from_secs(10),
            init_timeout: Duration::from_secs(120),
            min_container_height_px: 200,
        }
    }
}

/// Browser engine family, detected once from the user agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserEngine {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Other,
}

/// Immutable per-process description of the hosting browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserProfile {
    pub engine: BrowserEngine,
    pub is_private_mode: bool,
    pub supports_permissions_query: bool,
}

impl BrowserProfile {
    /// Derives a profile from a raw user-agent string.
    ///
    /// Order matters: Edge and Chrome both advertise `Chrome/`, and every
    /// WebKit-derived engine advertises `Safari/`.
    pub fn from_user_agent(user_agent: &str, is_private_mode: bool) -> Self {
        let engine = if user_agent.contains("Edg/") || user_agent.contains("Edge/") {
            BrowserEngine::Edge
        } else if user_agent.contains("Firefox/") {
            BrowserEngine::Firefox
        } else if user_agent.contains("Chrome/") || user_agent.contains("Chromium/") {
            BrowserEngine::Chrome
        } else if user_agent.contains("Safari/") {
            BrowserEngine::Safari
        } else {
            BrowserEngine::Other
        };

        let supports_permissions_query =
            !matches!(engine, BrowserEngine::Safari | BrowserEngine::Other);

        Self {
            engine,
            is_private_mode,
            supports_permissions_query,
        }
    }

    /// Resolves the viewport tuning for this browser.
    ///
    /// Safari and Firefox need noticeably longer settle delays between a
    /// container resize and a reliable height measurement than Chromium
    /// engines do.
    pub fn init_options(&self) -> InitOptions {
        let (settle_delay_ms, resize_debounce_ms, gesture_handling) = match self.engine {
            BrowserEngine::Chrome | BrowserEngine::Edge => (150, 150, GestureHandling::Greedy),
            BrowserEngine::Firefox => (400, 250, GestureHandling::Cooperative),
            BrowserEngine::Safari => (450, 300, GestureHandling::Cooperative),
            BrowserEngine::Other => (300, 200, GestureHandling::Auto),
        };

        InitOptions {
            settle_delay_ms,
            resize_debounce_ms,
            default_zoom: 15.0,
            gesture_handling,
            restricted_bounds: Some(SERVICE_BOUNDS.clone()),
            // A private window has no storage worth trusting across navigations
            use_persisted_grant: !self.is_private_mode,
        }
    }
}

impl Default for BrowserProfile {
    fn default() -> Self {
        Self {
            engine: BrowserEngine::Other,
            is_private_mode: false,
            supports_permissions_query: false,
        }
    }
}

/// Gesture handling mode passed through to the mapping SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureHandling {
    Greedy,
    Cooperative,
    Auto,
}

/// Viewport tuning resolved once per process from the browser profile
#[derive(Debug, Clone, PartialEq)]
pub struct InitOptions {
    /// Wait after a resize/orientation event before trusting the measured height
    pub settle_delay_ms: u64,
    /// Debounce applied to resize event bursts
    pub resize_debounce_ms: u64,
    pub default_zoom: f64,
    pub gesture_handling: GestureHandling,
    pub restricted_bounds: Option<LatLngBounds>,
    /// Whether the persisted permission grant may skip the prompt
    pub use_persisted_grant: bool,
}

impl InitOptions {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                             (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAFARI_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
                             AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/604.1";
    const FIREFOX_UA: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:122.0) Gecko/20100101 Firefox/122.0";
    const EDGE_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                           (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0";

    #[test]
    fn test_engine_detection_order() {
        assert_eq!(
            BrowserProfile::from_user_agent(CHROME_UA, false).engine,
            BrowserEngine::Chrome
        );
        assert_eq!(
            BrowserProfile::from_user_agent(SAFARI_UA, false).engine,
            BrowserEngine::Safari
        );
        assert_eq!(
            BrowserProfile::from_user_agent(FIREFOX_UA, false).engine,
            BrowserEngine::Firefox
        );
        assert_eq!(
            BrowserProfile::from_user_agent(EDGE_UA, false).engine,
            BrowserEngine::Edge
        );
        assert_eq!(
            BrowserProfile::from_user_agent("curl/8.0", false).engine,
            BrowserEngine::Other
        );
    }

    #[test]
    fn test_webkit_engines_get_longer_settle_delays() {
        let chrome = BrowserProfile::from_user_agent(CHROME_UA, false).init_options();
        let safari = BrowserProfile::from_user_agent(SAFARI_UA, false).init_options();
        let firefox = BrowserProfile::from_user_agent(FIREFOX_UA, false).init_options();

        assert!(safari.settle_delay_ms > chrome.settle_delay_ms);
        assert!(firefox.settle_delay_ms > chrome.settle_delay_ms);
    }

    #[test]
    fn test_private_mode_disables_persisted_grant() {
        let normal = BrowserProfile::from_user_agent(CHROME_UA, false).init_options();
        let private = BrowserProfile::from_user_agent(CHROME_UA, true).init_options();

        assert!(normal.use_persisted_grant);
        assert!(!private.use_persisted_grant);
    }

    #[test]
    fn test_restricted_bounds_cover_service_area() {
        let options = BrowserProfile::from_user_agent(CHROME_UA, false).init_options();
        let bounds = options.restricted_bounds.expect("bounds");
        assert!(bounds.contains(&LatLng::new(35.68, 139.76)));
        assert!(!bounds.contains(&LatLng::new(48.85, 2.35)));
    }

    #[test]
    fn test_default_config_radii_are_independent() {
        let config = EngineConfig::default();
        assert_eq!(config.map_radius_meters, 1_000.0);
        assert_eq!(config.feed_radius_meters, 5_000.0);
    }
}
