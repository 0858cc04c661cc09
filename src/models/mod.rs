use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod priority;
pub mod profile;
pub mod watchlist_item;
pub mod weights;

pub use priority::{Prioritized, Priority};
pub use profile::Profile;
pub use watchlist_item::WatchlistItem;
pub use weights::{WeightError, WeightTable};

/// Kind of media a watchlist item refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Movie,
    Series,
    Anime,
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Movie => write!(f, "MOVIE"),
            MediaType::Series => write!(f, "SERIES"),
            MediaType::Anime => write!(f, "ANIME"),
        }
    }
}
