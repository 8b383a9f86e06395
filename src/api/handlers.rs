use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{self, CurrentUser};
use crate::error::{AppError, AppResult};
use crate::models::{Item, Rating, Strategy, User, SCORE_RANGE};
use crate::services::RecommenderEngine;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub preferences: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            preferences: user.preferences.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            tags: item.tags.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RateItemRequest {
    pub item_id: Uuid,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub item: ItemResponse,
}

impl RatingResponse {
    fn new(rating: &Rating, item: &Item) -> Self {
        Self {
            id: rating.id,
            user_id: rating.user_id,
            item_id: rating.item_id,
            score: rating.score,
            created_at: rating.created_at,
            item: ItemResponse::from(item),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub top_k: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationEntry {
    pub item: ItemResponse,
    pub score: f64,
    pub strategy: Strategy,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendationEntry>,
    pub generated_at: DateTime<Utc>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    if request.password.chars().count() < 6 {
        return Err(AppError::InvalidInput(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    let password_hash = auth::hash_password(&request.password)?;

    let mut inner = state.inner.write().await;
    if inner.user_by_email(&request.email).is_some() {
        return Err(AppError::InvalidInput("Email already registered".to_string()));
    }

    let user = User::new(request.email, request.full_name, password_hash);
    let response = UserResponse::from(&user);
    tracing::info!(user_id = %user.id, "Registered user");
    inner.users.insert(user.id, user);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let inner = state.inner.read().await;
    let user = inner
        .user_by_email(&request.email)
        .filter(|user| auth::verify_password(&request.password, &user.password_hash))
        .ok_or_else(|| AppError::Unauthorized("Incorrect email or password".to_string()))?;

    let access_token = auth::create_access_token(
        &user.email,
        &state.config.secret_key,
        state.config.access_token_expire_minutes,
    )?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// The authenticated caller's own account
pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// Replace the caller's explicit preference tags
pub async fn update_preferences(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdatePreferencesRequest>,
) -> AppResult<Json<UserResponse>> {
    let mut inner = state.inner.write().await;
    let stored = inner
        .users
        .get_mut(&user.id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    stored.set_preferences(request.tags);
    Ok(Json(UserResponse::from(&*stored)))
}

/// Get the full catalog, ordered by title
pub async fn list_items(State(state): State<AppState>) -> Json<Vec<ItemResponse>> {
    let inner = state.inner.read().await;
    let items: Vec<ItemResponse> = inner
        .items_by_title()
        .into_iter()
        .map(ItemResponse::from)
        .collect();
    Json(items)
}

/// Add a new catalog item
pub async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<CreateItemRequest>,
) -> (StatusCode, Json<ItemResponse>) {
    let item = Item::new(
        request.title,
        request.description,
        request.category,
        request.tags,
    );
    let response = ItemResponse::from(&item);

    let mut inner = state.inner.write().await;
    inner.items.insert(item.id, item);

    (StatusCode::CREATED, Json(response))
}

/// Rate a catalog item; re-rating overwrites the previous score
pub async fn rate_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<RateItemRequest>,
) -> AppResult<Json<RatingResponse>> {
    let (min, max) = SCORE_RANGE;
    if !(min..=max).contains(&request.score) {
        return Err(AppError::InvalidInput(format!(
            "Score must be between {} and {}",
            min, max
        )));
    }

    let mut inner = state.inner.write().await;
    let item = inner
        .items
        .get(&request.item_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

    let rating = inner.upsert_rating(user.id, request.item_id, request.score);
    tracing::info!(
        user_id = %user.id,
        item_id = %request.item_id,
        score = request.score,
        "Recorded rating"
    );

    Ok(Json(RatingResponse::new(&rating, &item)))
}

/// The caller's rating history, most recent first
pub async fn my_ratings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<Vec<RatingResponse>> {
    let inner = state.inner.read().await;
    let ratings: Vec<RatingResponse> = inner
        .user_ratings(user.id)
        .into_iter()
        .filter_map(|rating| {
            inner
                .items
                .get(&rating.item_id)
                .map(|item| RatingResponse::new(rating, item))
        })
        .collect();
    Json(ratings)
}

/// Run the hybrid recommender for the authenticated caller
pub async fn get_recommendations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let requested = params.top_k.unwrap_or(state.config.default_top_k as i64);
    // Non-positive caps mean "nothing", not an error
    let top_k = usize::try_from(requested).unwrap_or(0);

    let results = {
        let inner = state.inner.read().await;
        let engine = RecommenderEngine::new(&inner.items, &inner.ratings);
        engine.recommend(&user, top_k)
    };

    if results.is_empty() {
        return Err(AppError::NotFound(
            "No recommendations available yet".to_string(),
        ));
    }

    let strategy = results[0].strategy;
    let recommended_ids: Vec<Uuid> = results.iter().map(|r| r.item.id).collect();
    tracing::info!(
        user_id = %user.id,
        strategy = %strategy,
        count = recommended_ids.len(),
        "Serving recommendations"
    );

    {
        let mut inner = state.inner.write().await;
        inner.log_recommendations(user.id, strategy, recommended_ids);
    }

    let recommendations = results
        .iter()
        .map(|r| RecommendationEntry {
            item: ItemResponse::from(&r.item),
            score: r.score,
            strategy: r.strategy,
        })
        .collect();

    Ok(Json(RecommendationResponse {
        recommendations,
        generated_at: Utc::now(),
    }))
}
