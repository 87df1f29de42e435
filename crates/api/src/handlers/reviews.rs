//! Handlers for the review queue.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use quire_core::types::DbId;
use quire_db::models::review_submission::{ListSubmissionsParams, ReviewRequest};
use quire_db::workflow::ReviewWorkflow;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /reviews
///
/// List submissions. `status` filters by submission status.
pub async fn list_reviews(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListSubmissionsParams>,
) -> AppResult<impl IntoResponse> {
    let submissions = ReviewWorkflow::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: submissions }))
}

/// GET /reviews/{id}
pub async fn get_review(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = ReviewWorkflow::detail(&state.pool, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// POST /reviews/{id}
///
/// Approve or reject. A conflicting approval still answers 200, with the
/// conflict payload as `data`; the caller resolves it by posting again with
/// `merged_content`.
pub async fn review_submission(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = ReviewWorkflow::review(&state.pool, id, auth.user_id, &input).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /reviews/{id}/withdraw
pub async fn withdraw_submission(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let submission = ReviewWorkflow::withdraw(&state.pool, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: submission }))
}

/// GET /reviews/{id}/conflicts
pub async fn list_conflicts(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let conflicts = ReviewWorkflow::conflicts(&state.pool, id).await?;
    Ok(Json(DataResponse { data: conflicts }))
}
