use rand::Rng;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::WatchlistItem,
    services::{candidates::CandidateSource, drawer::WeightedDrawer},
};

/// Picks the next thing to watch for a profile
///
/// Fetches the profile's unwatched items and, once the fetch resolves, runs
/// a single weighted draw over them. An empty list is reported as
/// [`AppError::NothingToWatch`] without invoking the drawer.
pub async fn pick_next<R>(
    source: &dyn CandidateSource,
    drawer: &WeightedDrawer,
    profile_id: Uuid,
    rng: &mut R,
) -> AppResult<WatchlistItem>
where
    R: Rng + Send + ?Sized,
{
    let candidates = source.unwatched(profile_id).await?;

    if candidates.is_empty() {
        tracing::info!(profile_id = %profile_id, "No unwatched items to pick from");
        return Err(AppError::NothingToWatch);
    }

    let picked = drawer.draw(&candidates, rng)?;

    tracing::info!(
        profile_id = %profile_id,
        candidate_count = candidates.len(),
        item_id = %picked.id,
        priority = %picked.priority,
        "Picked next item to watch"
    );

    Ok(picked.clone())
}
