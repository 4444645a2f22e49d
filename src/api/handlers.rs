use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{NewRecommendation, Recommendation};

use super::AppState;

/// Unwraps a path segment, reporting rejections as invalid input
fn path_param<T>(param: Result<Path<T>, PathRejection>, name: &str) -> AppResult<T> {
    param
        .map(|Path(value)| value)
        .map_err(|e| AppError::InvalidInput(format!("Invalid {}: {}", name, e.body_text())))
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Create a new recommendation
pub async fn create_recommendation(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<NewRecommendation>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Recommendation>)> {
    let Json(request) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    request.validate()?;

    tracing::info!(
        request_id = %request_id,
        name = %request.name,
        "Creating recommendation"
    );

    let created = state.recommendations.insert(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Add one point to a recommendation's score
pub async fn upvote(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = path_param(id, "id")?;
    tracing::info!(request_id = %request_id, recommendation_id = id, "Upvote");

    state.recommendations.upvote(id).await?;
    Ok(StatusCode::OK)
}

/// Remove one point from a recommendation's score
///
/// Responds 200 whether or not the vote pushed the recommendation out.
pub async fn downvote(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = path_param(id, "id")?;
    tracing::info!(request_id = %request_id, recommendation_id = id, "Downvote");

    state.recommendations.downvote(id).await?;
    Ok(StatusCode::OK)
}

/// Get all recommendations
pub async fn get_recommendations(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Recommendation>>> {
    Ok(Json(state.recommendations.get_all().await?))
}

/// Get a single recommendation
pub async fn get_recommendation(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<Recommendation>> {
    let id = path_param(id, "id")?;
    Ok(Json(state.recommendations.get_by_id(id).await?))
}

/// Get a popularity-weighted random recommendation
pub async fn get_random(State(state): State<AppState>) -> AppResult<Json<Recommendation>> {
    Ok(Json(state.recommendations.get_random().await?))
}

/// Get the highest-scoring recommendations
pub async fn get_top(
    State(state): State<AppState>,
    amount: Result<Path<usize>, PathRejection>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let amount = path_param(amount, "amount")?;
    Ok(Json(state.recommendations.get_top(amount).await?))
}

/// Wipe every recommendation (end-to-end suites only)
pub async fn reset(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<StatusCode> {
    tracing::warn!(request_id = %request_id, "Resetting recommendations");
    state.recommendations.reset().await?;
    Ok(StatusCode::OK)
}
