use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::{city::CityId, model::WeatherSnapshot};

/// Last known snapshot per city. Entries are replaced whole, never patched.
#[derive(Debug, Clone, Default)]
pub struct CityStore {
    snapshots: HashMap<CityId, WeatherSnapshot>,
}

impl CityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_snapshot(&mut self, city: CityId, snapshot: WeatherSnapshot) {
        self.snapshots.insert(city, snapshot);
    }

    pub fn get_snapshot(&self, city: CityId) -> Option<&WeatherSnapshot> {
        self.snapshots.get(&city)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshState {
    pub last_viewed: Option<CityId>,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// Mutable state shared by the dashboard and the scheduler.
///
/// Each piece has its own lock and no lock is held across an `.await`.
#[derive(Debug, Default)]
pub struct AppState {
    store: RwLock<CityStore>,
    refresh: RwLock<RefreshState>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_snapshot(&self, city: CityId, snapshot: WeatherSnapshot) {
        self.store.write().record_snapshot(city, snapshot);
    }

    pub fn snapshot(&self, city: CityId) -> Option<WeatherSnapshot> {
        self.store.read().get_snapshot(city).cloned()
    }

    /// Consistent copy of the whole store, for rendering.
    pub fn store(&self) -> CityStore {
        self.store.read().clone()
    }

    pub fn refresh_state(&self) -> RefreshState {
        *self.refresh.read()
    }

    pub fn set_last_viewed(&self, city: CityId) {
        self.refresh.write().last_viewed = Some(city);
    }

    pub fn mark_refreshed(&self, at: DateTime<Utc>) {
        self.refresh.write().last_refresh = Some(at);
    }
}
