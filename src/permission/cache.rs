//! Time-boxed, persisted location permission.
//!
//! A grant is one small record under a fixed storage key: granted-at and
//! expires-at. It is replaced wholesale or absent, never partially updated,
//! and only explicit [`PermissionCache::extend`] calls move the expiry
//! forward. Successful position reads do not touch the window, so consent
//! lapses on schedule even while the app keeps fetching position elsewhere.

use crate::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Persisted record of "location access granted until time T"
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub granted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Answer to "may we read position, and for how much longer?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionStatus {
    pub is_granted: bool,
    pub remaining_minutes: i64,
}

impl PermissionStatus {
    fn not_granted() -> Self {
        Self {
            is_granted: false,
            remaining_minutes: 0,
        }
    }
}

/// Persisted permission boundary: one small JSON-like record per device
pub trait GrantStore: Send + Sync {
    fn load(&self) -> Result<Option<PermissionGrant>>;
    fn save(&self, grant: &PermissionGrant) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Process-local store, used in tests and private-mode sessions
#[derive(Default)]
pub struct MemoryGrantStore {
    slot: Mutex<Option<PermissionGrant>>,
}

impl GrantStore for MemoryGrantStore {
    fn load(&self) -> Result<Option<PermissionGrant>> {
        Ok(*self.slot.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn save(&self, grant: &PermissionGrant) -> Result<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(*grant);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Grant persisted as one JSON document at a fixed path, the device-storage
/// analogue of a browser storage key
pub struct JsonGrantStore {
    path: PathBuf,
}

impl JsonGrantStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GrantStore for JsonGrantStore {
    fn load(&self) -> Result<Option<PermissionGrant>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, grant: &PermissionGrant) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(grant)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

type Clock = dyn Fn() -> DateTime<Utc> + Send + Sync;

/// Shared, read-mostly view of the persisted grant.
///
/// Cloneable so every view that needs position can hold one; writes are
/// last-writer-wins through the store's own synchronization.
#[derive(Clone)]
pub struct PermissionCache {
    store: Arc<dyn GrantStore>,
    clock: Arc<Clock>,
    default_window_minutes: i64,
}

impl PermissionCache {
    pub fn new(store: Arc<dyn GrantStore>) -> Self {
        Self::with_clock(store, Arc::new(Utc::now))
    }

    /// Injectable clock, so expiry scenarios are testable without sleeping
    pub fn with_clock(store: Arc<dyn GrantStore>, clock: Arc<Clock>) -> Self {
        Self {
            store,
            clock,
            default_window_minutes: 60,
        }
    }

    pub fn with_window_minutes(mut self, minutes: i64) -> Self {
        self.default_window_minutes = minutes;
        self
    }

    /// Reads the persisted grant. Granted iff a record exists and now is
    /// before its expiry; remaining minutes round up.
    pub fn check(&self) -> PermissionStatus {
        let now = (self.clock)();
        match self.store.load() {
            Ok(Some(grant)) if now < grant.expires_at => {
                let remaining_secs = (grant.expires_at - now).num_seconds();
                PermissionStatus {
                    is_granted: true,
                    remaining_minutes: (remaining_secs + 59) / 60,
                }
            }
            Ok(_) => PermissionStatus::not_granted(),
            Err(e) => {
                log::warn!("failed to read permission grant, treating as not granted: {}", e);
                PermissionStatus::not_granted()
            }
        }
    }

    /// Writes a fresh grant valid for `duration_minutes` from now
    pub fn grant(&self, duration_minutes: i64) -> Result<PermissionGrant> {
        let now = (self.clock)();
        let grant = PermissionGrant {
            granted_at: now,
            expires_at: now + Duration::minutes(duration_minutes),
        };
        self.store.save(&grant)?;
        log::info!(
            "location permission granted until {}",
            grant.expires_at.format("%H:%M:%S")
        );
        Ok(grant)
    }

    /// Grants for the default window
    pub fn grant_default(&self) -> Result<PermissionGrant> {
        self.grant(self.default_window_minutes)
    }

    /// Refreshes the validity window from now. Equivalent to a fresh grant;
    /// kept as a distinct operation because only an explicit user action may
    /// move the expiry forward.
    pub fn extend(&self, duration_minutes: i64) -> Result<PermissionGrant> {
        self.grant(duration_minutes)
    }

    /// Removes the grant, used on explicit denial or logout
    pub fn clear(&self) -> Result<()> {
        self.store.clear()
    }
}
