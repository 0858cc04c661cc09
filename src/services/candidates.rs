use uuid::Uuid;

use crate::{error::AppResult, models::WatchlistItem};

/// Supplier of pick candidates
///
/// Returns the unwatched items belonging to a profile. An empty result is
/// valid; callers check it before invoking the drawer.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    async fn unwatched(&self, profile_id: Uuid) -> AppResult<Vec<WatchlistItem>>;
}
