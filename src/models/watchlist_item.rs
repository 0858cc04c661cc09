use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MediaType, Priority, Prioritized};

/// An entry in a profile's watchlist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistItem {
    /// Unique identifier for the item
    pub id: Uuid,
    /// Profile that owns the item
    pub profile_id: Uuid,
    pub title: String,
    pub media_type: MediaType,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f32>,
    /// Catalog identifier the item was added from (TMDB / MyAnimeList id)
    pub external_id: Option<String>,
    pub genres: Vec<String>,
    pub priority: Priority,
    pub watched: bool,
    pub added_at: DateTime<Utc>,
    pub watched_at: Option<DateTime<Utc>>,
}

impl WatchlistItem {
    /// Creates a new unwatched item with the default priority
    pub fn new(profile_id: Uuid, title: String, media_type: MediaType) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile_id,
            title,
            media_type,
            description: None,
            poster: None,
            year: None,
            rating: None,
            external_id: None,
            genres: Vec::new(),
            priority: Priority::default(),
            watched: false,
            added_at: Utc::now(),
            watched_at: None,
        }
    }

    /// Sets the watched flag, stamping or clearing `watched_at`
    pub fn set_watched(&mut self, watched: bool) {
        if watched && !self.watched {
            self.watched_at = Some(Utc::now());
        } else if !watched {
            self.watched_at = None;
        }
        self.watched = watched;
    }
}

impl Prioritized for WatchlistItem {
    fn priority(&self) -> &Priority {
        &self.priority
    }
}
