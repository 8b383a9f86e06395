use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Accounts
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/users/me", get(handlers::current_user))
        .route("/users/me/preferences", post(handlers::update_preferences))
        // Catalog
        .route("/items", get(handlers::list_items))
        .route("/items", post(handlers::create_item))
        // Ratings
        .route("/ratings", post(handlers::rate_item))
        .route("/ratings/me", get(handlers::my_ratings))
        // Recommendations
        .route("/recommendations", get(handlers::get_recommendations))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
