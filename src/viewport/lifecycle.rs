//! Map viewport initialization lifecycle.
//!
//! Drives an asynchronously loading mapping SDK from mount to a stable,
//! interactive map: SDK load, container-size readiness, position
//! availability, construction, and the first idle event, with a hard
//! initialization timeout and user-initiated retry. Browser differences are
//! confined to the [`InitOptions`] resolved once at construction; the state
//! machine itself is browser-agnostic.

use crate::core::config::{BrowserProfile, EngineConfig, InitOptions};
use crate::core::geo::LatLng;
use crate::traits::{MapInit, MapSdk};
use crate::EngineError;
use instant::Instant;
use std::sync::Arc;

/// States a map rendering surface passes through from mount to interactive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Idle,
    SdkLoading,
    AwaitingContainerSize,
    AwaitingPosition,
    Initializing,
    Ready,
    Error,
}

impl LifecyclePhase {
    /// Terminal states do not time out
    fn is_terminal(&self) -> bool {
        matches!(self, LifecyclePhase::Ready | LifecyclePhase::Error)
    }
}

/// Orchestrates SDK load, container readiness, map construction, and
/// idle/resize handling for one mounted map view.
///
/// At most one map instance is ever constructed per mount: the idempotency
/// flag holds even when the triggering effect fires repeatedly. Errors are
/// surfaced with a message and a user-initiated [`retry`](Self::retry);
/// nothing retries automatically.
pub struct ViewportLifecycle {
    sdk: Arc<dyn MapSdk>,
    options: InitOptions,
    config: EngineConfig,
    phase: LifecyclePhase,
    /// Guards against double construction under rapid re-renders
    constructed: bool,
    mounted_at: Option<Instant>,
    pending_position: Option<LatLng>,
    container_height: u32,
    last_error: Option<String>,
}

impl ViewportLifecycle {
    pub fn new(sdk: Arc<dyn MapSdk>, profile: &BrowserProfile, config: EngineConfig) -> Self {
        Self {
            sdk,
            options: profile.init_options(),
            config,
            phase: LifecyclePhase::Idle,
            constructed: false,
            mounted_at: None,
            pending_position: None,
            container_height: 0,
            last_error: None,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == LifecyclePhase::Ready
    }

    /// Human-readable message for the error state
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Browser tuning the host should apply to its own event wiring
    pub fn options(&self) -> &InitOptions {
        &self.options
    }

    /// Begins the lifecycle: waits for the SDK script, then watches for
    /// container size. No-op unless the controller is idle.
    pub async fn mount(&mut self) {
        if self.phase != LifecyclePhase::Idle {
            return;
        }
        self.phase = LifecyclePhase::SdkLoading;
        self.mounted_at = Some(Instant::now());
        log::debug!("viewport lifecycle: loading map SDK");

        let loaded = self.sdk.ensure_loaded().await;
        match loaded {
            Ok(()) => {
                self.phase = LifecyclePhase::AwaitingContainerSize;
                // The container may already be laid out; re-check on the
                // last reported measurement
                self.advance_on_container();
            }
            Err(e) => self.fail(e),
        }
    }

    /// Reports a container height measurement, taken after the per-browser
    /// settle delay following a resize or orientation-change event.
    pub fn on_container_resized(&mut self, height_px: u32) {
        self.container_height = height_px;
        self.advance_on_container();
        self.try_initialize();
    }

    fn advance_on_container(&mut self) {
        if self.phase == LifecyclePhase::AwaitingContainerSize
            && self.container_height >= self.config.min_container_height_px
        {
            log::debug!(
                "viewport lifecycle: container settled at {}px",
                self.container_height
            );
            self.phase = LifecyclePhase::AwaitingPosition;
        }
    }

    /// Reports a resolved position from the geo sampler
    pub fn on_position(&mut self, position: LatLng) {
        self.pending_position = Some(position);
        self.try_initialize();
    }

    fn try_initialize(&mut self) {
        if self.constructed || self.phase != LifecyclePhase::AwaitingPosition {
            return;
        }
        let center = match self.pending_position {
            Some(position) => position,
            None => return,
        };

        self.phase = LifecyclePhase::Initializing;
        self.constructed = true;

        let init = MapInit {
            center,
            zoom: self.options.default_zoom,
            gesture_handling: self.options.gesture_handling,
            restricted_bounds: self.options.restricted_bounds.clone(),
        };

        log::info!(
            "constructing map at {:.4},{:.4} zoom {}",
            center.lat,
            center.lng,
            init.zoom
        );
        if let Err(e) = self.sdk.construct(&init) {
            self.fail(e);
        }
    }

    /// The SDK's first stable render. Re-asserts center and forces a resize:
    /// the initial paint can be sized wrong if the container changed size
    /// during load.
    pub fn on_sdk_idle(&mut self) {
        if self.phase != LifecyclePhase::Initializing {
            return;
        }
        if let Some(center) = self.pending_position {
            if let Err(e) = self.sdk.set_center(center) {
                log::warn!("failed to re-assert center after idle: {}", e);
            }
        }
        self.sdk.trigger_resize();
        self.phase = LifecyclePhase::Ready;
        log::info!("map viewport ready");
    }

    /// An error event from the SDK itself
    pub fn on_sdk_error(&mut self, message: &str) {
        let error = if self.phase == LifecyclePhase::SdkLoading {
            EngineError::SdkLoad(message.to_string())
        } else {
            EngineError::Construction(message.to_string())
        };
        self.fail(error);
    }

    /// Deadline check, driven by the host's timer. Transitions to the error
    /// state when initialization has not reached idle within the configured
    /// timeout.
    pub fn tick(&mut self) {
        if self.phase.is_terminal() || self.phase == LifecyclePhase::Idle {
            return;
        }
        if let Some(mounted_at) = self.mounted_at {
            if mounted_at.elapsed() >= self.config.init_timeout {
                self.fail(EngineError::InitializationTimeout {
                    waited_secs: self.config.init_timeout.as_secs(),
                });
            }
        }
    }

    /// User-initiated restart after an error (or an explicit re-mount from
    /// ready). Clears derived map state, resets the idempotency flag, and
    /// returns to idle; the host then calls [`mount`](Self::mount) again.
    pub fn retry(&mut self) {
        log::info!("viewport lifecycle: retry requested from {:?}", self.phase);
        self.sdk.clear_markers();
        self.constructed = false;
        self.pending_position = None;
        self.mounted_at = None;
        self.container_height = 0;
        self.last_error = None;
        self.phase = LifecyclePhase::Idle;
    }

    /// Teardown on unmount: markers are removed and pending listeners must
    /// not fire against the dead view.
    pub fn unmount(&mut self) {
        self.sdk.clear_markers();
        self.constructed = false;
        self.pending_position = None;
        self.mounted_at = None;
        self.phase = LifecyclePhase::Idle;
    }

    fn fail(&mut self, error: EngineError) {
        log::error!("viewport lifecycle error: {}", error);
        self.last_error = Some(error.to_string());
        self.phase = LifecyclePhase::Error;
    }
}
