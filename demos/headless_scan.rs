use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use proxmap::prelude::*;

/// Example of driving the proximity engine without a browser or a real
/// mapping SDK: in-memory providers stand in for every boundary.
struct FixedProvider(LatLng);

#[async_trait]
impl PositionProvider for FixedProvider {
    async fn current_position(
        &self,
        _request: &PositionRequest,
    ) -> std::result::Result<LatLng, GeoError> {
        Ok(self.0)
    }
}

struct DemoSource;

#[async_trait]
impl ItemSource for DemoSource {
    async fn fetch_candidates(&self, now: DateTime<Utc>) -> Result<Vec<GeoItem>> {
        let soon = now + Duration::hours(3);
        Ok(vec![
            GeoItem::new("bento-a", "駅前弁当", LatLng::new(35.68121, 139.76711))
                .with_category(Category::Gourmet)
                .with_remaining(4)
                .with_expiry(soon),
            GeoItem::new("bento-b", "駅前弁当", LatLng::new(35.68119, 139.76709))
                .with_category(Category::Gourmet)
                .with_remaining(2)
                .with_expiry(soon),
            GeoItem::new("flowers", "花屋の束売り", LatLng::new(35.6830, 139.7640))
                .with_category(Category::Retail)
                .with_remaining(7)
                .with_expiry(soon),
            GeoItem::new("market", "青空マーケット", LatLng::new(35.6850, 139.7700))
                .with_category(Category::Event)
                .with_expiry(soon),
        ])
    }
}

struct PrintingSdk;

#[async_trait]
impl MapSdk for PrintingSdk {
    async fn ensure_loaded(&self) -> Result<()> {
        Ok(())
    }

    fn construct(&self, init: &MapInit) -> Result<()> {
        println!(
            "   constructed map at {:.4},{:.4} zoom {}",
            init.center.lat, init.center.lng, init.zoom
        );
        Ok(())
    }

    fn set_center(&self, _center: LatLng) -> Result<()> {
        Ok(())
    }

    fn trigger_resize(&self) {}

    fn replace_markers(&self, markers: Vec<MarkerDescriptor>) -> Result<()> {
        for marker in &markers {
            let position = marker.position();
            match marker.icon() {
                IconDescriptor::Pin { asset } => {
                    println!(
                        "   📍 {} at {:.4},{:.4} ({})",
                        marker.title(),
                        position.lat,
                        position.lng,
                        asset
                    );
                }
                IconDescriptor::RemainingBadge { width, height, .. } => {
                    println!(
                        "   💬 {} at {:.4},{:.4} (badge {}x{})",
                        marker.title(),
                        position.lat,
                        position.lng,
                        width,
                        height
                    );
                }
                IconDescriptor::ClusterBadge { count, diameter, .. } => {
                    println!(
                        "   🔴 {} items at {:.4},{:.4} (circle {}px)",
                        count, position.lat, position.lng, diameter
                    );
                }
            }
        }
        Ok(())
    }

    fn clear_markers(&self) {}
}

struct PrintingNavigator;

impl Navigator for PrintingNavigator {
    fn navigate(&self, path: &str, query: &[(String, String)]) {
        println!("   → navigate {} {:?}", path, query);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("🗺️ Proxmap Headless Example");
    println!("===========================");

    let here = LatLng::new(35.6812, 139.7671); // Tokyo Station
    let sdk = Arc::new(PrintingSdk);
    let permission = PermissionCache::new(Arc::new(MemoryGrantStore::default()));

    let orchestrator = MapViewOrchestrator::new(
        EngineConfig::default(),
        permission.clone(),
        Arc::new(FixedProvider(here)),
        Arc::new(DemoSource),
        sdk.clone(),
        Arc::new(PrintingNavigator),
    );

    let profile = BrowserProfile::from_user_agent(
        "Mozilla/5.0 AppleWebKit/537.36 Chrome/120.0.0.0 Safari/537.36",
        false,
    );
    println!(
        "✅ Browser profile: {:?}, settle delay {}ms",
        profile.engine,
        profile.init_options().settle_delay_ms
    );

    // Drive the viewport lifecycle to ready
    let mut lifecycle = ViewportLifecycle::new(sdk, &profile, EngineConfig::default());
    lifecycle.mount().await;
    lifecycle.on_container_resized(480);

    let position = orchestrator.acquire_position().await?;
    let status = permission.check();
    println!(
        "✅ Position acquired, permission valid for {} more minutes",
        status.remaining_minutes
    );

    lifecycle.on_position(position);
    lifecycle.on_sdk_idle();
    println!("✅ Viewport phase: {:?}", lifecycle.phase());

    // One recomputation pass
    println!("\n🎯 Markers within {}m:", orchestrator.config().map_radius_meters);
    let markers = orchestrator.refresh(position).await?;

    println!("\n🚀 Simulating marker clicks:");
    for marker in &markers {
        orchestrator.on_marker_click(marker);
    }

    Ok(())
}
