use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Profiles
        .route(
            "/profiles",
            get(handlers::get_profiles).post(handlers::create_profile),
        )
        .route(
            "/profiles/:id",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        // Watchlist
        .route(
            "/profiles/:id/items",
            get(handlers::get_items).post(handlers::create_item),
        )
        .route(
            "/items/:id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        // Weighted pick
        .route("/profiles/:id/pick", post(handlers::pick))
        .route("/profiles/:id/odds", get(handlers::odds))
}
