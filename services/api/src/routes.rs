//! API service routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{
        LoginRequest, SignupRequest, UpdateUserRequest, UserResponse,
        tweet::{NewTweetRequest, UpdateTweetRequest},
    },
    validation::Validate,
};

/// JSON body whose rejections render as [`ApiError`]
type JsonBody<T> = WithRejection<Json<T>, ApiError>;

/// Record id taken from the path
type IdPath = WithRejection<Path<Uuid>, ApiError>;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/users", get(get_users))
        .route("/users/:id", get(get_user))
        .route("/users/:id/delete", delete(delete_user))
        .route("/users/:id/update", put(update_user));

    let tweet_routes = Router::new()
        .route("/", get(get_tweets))
        .route("/post", post(post_tweet))
        .route("/tweets/:id", get(get_tweet))
        .route("/tweets/:id/delete", delete(delete_tweet))
        .route("/tweets/:id/update", put(update_tweet));

    Router::new()
        .route("/health", get(health_check))
        .merge(user_routes)
        .merge(tweet_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api"
    }))
}

/// Register a new user
pub async fn signup(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): JsonBody<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_repository.signup(&payload).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Log a user in with email and password
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): JsonBody<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Login attempt for user: {}", payload.email);
    payload.validate()?;

    let user = state
        .user_repository
        .authenticate(&payload.email, &payload.password)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(UserResponse::from(user)))
}

/// Get all users
pub async fn get_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users: Vec<UserResponse> = state
        .user_repository
        .get_all()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    let user = state.user_repository.find_by_id(id).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Replace a user's profile; responds with the updated user
pub async fn update_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(payload), _): JsonBody<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_repository.update(id, &payload).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete a user; responds with the removed user
pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    let user = state.user_repository.delete(id).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Get all tweets
pub async fn get_tweets(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let tweets = state.tweet_repository.get_all().await?;

    Ok(Json(tweets))
}

/// Post a new tweet
pub async fn post_tweet(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): JsonBody<NewTweetRequest>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;
    let tweet = state.tweet_repository.post(&payload).await?;

    Ok((StatusCode::CREATED, Json(tweet)))
}

/// Get a tweet by ID
pub async fn get_tweet(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    let tweet = state.tweet_repository.find_by_id(id).await?;

    Ok(Json(tweet))
}

/// Replace a tweet's content; responds with the updated tweet
pub async fn update_tweet(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(payload), _): JsonBody<UpdateTweetRequest>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;
    let tweet = state.tweet_repository.update(id, &payload).await?;

    Ok(Json(tweet))
}

/// Delete a tweet; responds with the removed tweet
pub async fn delete_tweet(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    let tweet = state.tweet_repository.delete(id).await?;

    Ok(Json(tweet))
}
