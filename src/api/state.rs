use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Profile, WatchlistItem};
use crate::services::{CandidateSource, WeightedDrawer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    pub drawer: Arc<WeightedDrawer>,
}

/// Inner state that can be modified
#[derive(Default)]
pub struct AppStateInner {
    pub profiles: HashMap<Uuid, Profile>,
    pub items: HashMap<Uuid, WatchlistItem>,
}

impl AppStateInner {
    /// Looks up a profile, failing with `NotFound`
    pub fn profile(&self, profile_id: Uuid) -> AppResult<&Profile> {
        self.profiles
            .get(&profile_id)
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", profile_id)))
    }

    /// All items owned by a profile, highest priority first, then oldest first
    pub fn items_for(&self, profile_id: Uuid) -> Vec<&WatchlistItem> {
        let mut items: Vec<&WatchlistItem> = self
            .items
            .values()
            .filter(|item| item.profile_id == profile_id)
            .collect();

        items.sort_by(|a, b| {
            b.priority
                .rank()
                .cmp(&a.priority.rank())
                .then(a.added_at.cmp(&b.added_at))
        });
        items
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a new empty application state with the default drawer
    pub fn new() -> Self {
        Self::with_drawer(WeightedDrawer::default())
    }

    /// Creates a new empty application state using the given drawer
    pub fn with_drawer(drawer: WeightedDrawer) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner::default())),
            drawer: Arc::new(drawer),
        }
    }
}

#[async_trait::async_trait]
impl CandidateSource for AppState {
    async fn unwatched(&self, profile_id: Uuid) -> AppResult<Vec<WatchlistItem>> {
        let inner = self.inner.read().await;
        inner.profile(profile_id)?;

        Ok(inner
            .items_for(profile_id)
            .into_iter()
            .filter(|item| !item.watched)
            .cloned()
            .collect())
    }
}
