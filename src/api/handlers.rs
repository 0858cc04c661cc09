use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{MediaType, Priority, Profile, WatchlistItem};
use crate::services::{pick_next, CandidateSource};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    pub media_type: MediaType,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f32>,
    pub external_id: Option<String>,
    pub genres: Option<Vec<String>>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f32>,
    pub priority: Option<Priority>,
    pub watched: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ItemFilter {
    #[serde(rename = "type")]
    pub media_type: Option<MediaType>,
    pub watched: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PickQuery {
    /// Fixed seed for a reproducible draw
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct OddsEntry {
    pub item: WatchlistItem,
    pub weight: u32,
    pub probability: f64,
}

fn require_non_blank(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} must not be blank", field)));
    }
    Ok(trimmed.to_string())
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Get all profiles
pub async fn get_profiles(State(state): State<AppState>) -> Json<Vec<Profile>> {
    let inner = state.inner.read().await;
    let mut profiles: Vec<Profile> = inner.profiles.values().cloned().collect();
    profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Json(profiles)
}

/// Create a new profile
pub async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> AppResult<(StatusCode, Json<Profile>)> {
    let profile = Profile::new(require_non_blank("name", &request.name)?);

    let mut inner = state.inner.write().await;
    inner.profiles.insert(profile.id, profile.clone());

    tracing::info!(profile_id = %profile.id, "Profile created");

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Get a single profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    let inner = state.inner.read().await;
    Ok(Json(inner.profile(profile_id)?.clone()))
}

/// Rename a profile
pub async fn update_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    Json(request): Json<ProfileRequest>,
) -> AppResult<Json<Profile>> {
    let name = require_non_blank("name", &request.name)?;

    let mut inner = state.inner.write().await;
    let profile = inner
        .profiles
        .get_mut(&profile_id)
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", profile_id)))?;
    profile.name = name;

    Ok(Json(profile.clone()))
}

/// List a profile's watchlist
pub async fn get_items(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    Query(filter): Query<ItemFilter>,
) -> AppResult<Json<Vec<WatchlistItem>>> {
    let inner = state.inner.read().await;
    inner.profile(profile_id)?;

    let items: Vec<WatchlistItem> = inner
        .items_for(profile_id)
        .into_iter()
        .filter(|item| filter.media_type.map_or(true, |t| item.media_type == t))
        .filter(|item| filter.watched.map_or(true, |w| item.watched == w))
        .cloned()
        .collect();

    Ok(Json(items))
}

/// Add an item to a profile's watchlist
pub async fn create_item(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
    Json(request): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<WatchlistItem>)> {
    let title = require_non_blank("title", &request.title)?;

    let mut inner = state.inner.write().await;
    inner.profile(profile_id)?;

    if let Some(external_id) = &request.external_id {
        let duplicate = inner.items.values().any(|item| {
            item.profile_id == profile_id
                && item.media_type == request.media_type
                && item.external_id.as_deref() == Some(external_id.as_str())
        });
        if duplicate {
            return Err(AppError::Conflict(format!(
                "{} is already in this list",
                title
            )));
        }
    }

    let mut item = WatchlistItem::new(profile_id, title, request.media_type);
    item.description = request.description;
    item.poster = request.poster;
    item.year = request.year;
    item.rating = request.rating;
    item.external_id = request.external_id;
    item.genres = request.genres.unwrap_or_default();
    if let Some(priority) = request.priority {
        item.priority = priority;
    }

    if !item.priority.is_known() {
        tracing::warn!(
            item_id = %item.id,
            priority = %item.priority,
            "Item stored with unrecognized priority"
        );
    }

    inner.items.insert(item.id, item.clone());

    tracing::info!(
        profile_id = %profile_id,
        item_id = %item.id,
        media_type = %item.media_type,
        priority = %item.priority,
        "Item added to watchlist"
    );

    Ok((StatusCode::CREATED, Json(item)))
}

/// Get a single watchlist item
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<WatchlistItem>> {
    let inner = state.inner.read().await;
    inner
        .items
        .get(&item_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))
}

/// Update priority, watched state, or details of an item
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> AppResult<Json<WatchlistItem>> {
    let title = request
        .title
        .as_deref()
        .map(|t| require_non_blank("title", t))
        .transpose()?;

    let mut inner = state.inner.write().await;
    let item = inner
        .items
        .get_mut(&item_id)
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))?;

    if let Some(title) = title {
        item.title = title;
    }
    if let Some(description) = request.description {
        item.description = Some(description);
    }
    if let Some(rating) = request.rating {
        item.rating = Some(rating);
    }
    if let Some(priority) = request.priority {
        item.priority = priority;
    }
    if let Some(watched) = request.watched {
        item.set_watched(watched);
    }

    tracing::info!(
        item_id = %item.id,
        priority = %item.priority,
        watched = item.watched,
        "Item updated"
    );

    Ok(Json(item.clone()))
}

/// Remove an item from its watchlist
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let mut inner = state.inner.write().await;
    inner
        .items
        .remove(&item_id)
        .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))?;

    tracing::info!(item_id = %item_id, "Item removed from watchlist");

    Ok(StatusCode::NO_CONTENT)
}

/// Pick something to watch with a weighted random draw
pub async fn pick(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(profile_id): Path<Uuid>,
    Query(query): Query<PickQuery>,
) -> AppResult<Json<WatchlistItem>> {
    tracing::info!(
        request_id = %request_id,
        profile_id = %profile_id,
        seeded = query.seed.is_some(),
        "Processing pick request"
    );

    let mut rng = match query.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let item = pick_next(&state, &state.drawer, profile_id, &mut rng).await?;

    Ok(Json(item))
}

/// Selection odds of every unwatched item
pub async fn odds(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<Vec<OddsEntry>>> {
    let candidates = state.unwatched(profile_id).await?;
    let odds = state.drawer.odds(&candidates);

    let entries = candidates
        .into_iter()
        .zip(odds)
        .map(|(item, (weight, probability))| OddsEntry {
            item,
            weight,
            probability,
        })
        .collect();

    Ok(Json(entries))
}
