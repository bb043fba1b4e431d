//! Geolocation sampling.
//!
//! [`PositionProvider`] is the platform boundary: one call that resolves to a
//! coordinate or one of four failure reasons, and that triggers the native
//! permission prompt when the state is undetermined. [`GeoSampler`] layers
//! the caller-specified timeout and the polling watch stream on top. The
//! sampler never retries; retry policy belongs to the caller.

use crate::core::geo::LatLng;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Failure reasons for a single geolocation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeoError {
    #[error("location permission denied by the user")]
    PermissionDenied,

    #[error("no geolocation capability on this device")]
    Unavailable,

    #[error("position request timed out")]
    Timeout,

    #[error("position could not be determined")]
    PositionUnavailable,
}

/// Timeout and accuracy hints passed to the platform
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRequest {
    pub timeout: Duration,
    pub high_accuracy: bool,
    /// Cached readings older than this are rejected by the platform
    pub maximum_age: Duration,
}

impl Default for PositionRequest {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            high_accuracy: true,
            maximum_age: Duration::from_secs(2),
        }
    }
}

/// Platform geolocation boundary.
///
/// Implementations may suspend while the native prompt is open. On success
/// the caller is responsible for writing a
/// [`PermissionGrant`](crate::permission::cache::PermissionGrant).
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn current_position(&self, request: &PositionRequest) -> Result<LatLng, GeoError>;
}

/// Produces single position readings or a stream of updates from a provider
#[derive(Clone)]
pub struct GeoSampler {
    provider: Arc<dyn PositionProvider>,
    request: PositionRequest,
}

impl GeoSampler {
    pub fn new(provider: Arc<dyn PositionProvider>) -> Self {
        Self {
            provider,
            request: PositionRequest::default(),
        }
    }

    pub fn with_request(provider: Arc<dyn PositionProvider>, request: PositionRequest) -> Self {
        Self { provider, request }
    }

    pub fn request(&self) -> &PositionRequest {
        &self.request
    }

    /// One current position reading, bounded by the request timeout
    pub async fn sample(&self) -> Result<LatLng, GeoError> {
        match tokio::time::timeout(
            self.request.timeout,
            self.provider.current_position(&self.request),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                log::warn!(
                    "position request exceeded {}s platform timeout",
                    self.request.timeout.as_secs()
                );
                Err(GeoError::Timeout)
            }
        }
    }

    /// Polls the provider on a fixed cadence and yields readings until the
    /// receiver is dropped. Individual read failures are logged and skipped.
    pub fn watch(&self, interval: Duration) -> mpsc::Receiver<LatLng> {
        let (tx, rx) = mpsc::channel(8);
        let provider = Arc::clone(&self.provider);
        let request = self.request.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                match tokio::time::timeout(request.timeout, provider.current_position(&request))
                    .await
                {
                    Ok(Ok(position)) => {
                        if tx.send(position).await.is_err() {
                            break;
                        }
                    }
                    Ok(Err(e)) => log::warn!("position watch read failed: {}", e),
                    Err(_) => log::warn!("position watch read timed out"),
                }
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(LatLng);

    #[async_trait]
    impl PositionProvider for FixedProvider {
        async fn current_position(&self, _request: &PositionRequest) -> Result<LatLng, GeoError> {
            Ok(self.0)
        }
    }

    struct DeniedProvider;

    #[async_trait]
    impl PositionProvider for DeniedProvider {
        async fn current_position(&self, _request: &PositionRequest) -> Result<LatLng, GeoError> {
            Err(GeoError::PermissionDenied)
        }
    }

    struct StalledProvider;

    #[async_trait]
    impl PositionProvider for StalledProvider {
        async fn current_position(&self, _request: &PositionRequest) -> Result<LatLng, GeoError> {
            futures::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_sample_returns_provider_reading() {
        let sampler = GeoSampler::new(Arc::new(FixedProvider(LatLng::new(35.68, 139.76))));
        let position = sampler.sample().await.unwrap();
        assert_eq!(position, LatLng::new(35.68, 139.76));
    }

    #[tokio::test]
    async fn test_sample_propagates_denial_without_retry() {
        let sampler = GeoSampler::new(Arc::new(DeniedProvider));
        assert_eq!(sampler.sample().await, Err(GeoError::PermissionDenied));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sample_times_out() {
        let request = PositionRequest {
            timeout: Duration::from_millis(50),
            ..Default::default()
        };
        let sampler = GeoSampler::with_request(Arc::new(StalledProvider), request);
        assert_eq!(sampler.sample().await, Err(GeoError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_yields_readings() {
        let sampler = GeoSampler::new(Arc::new(FixedProvider(LatLng::new(35.68, 139.76))));
        let mut updates = sampler.watch(Duration::from_secs(1));

        let first = updates.recv().await.unwrap();
        let second = updates.recv().await.unwrap();
        assert_eq!(first, LatLng::new(35.68, 139.76));
        assert_eq!(second, LatLng::new(35.68, 139.76));
    }
}
