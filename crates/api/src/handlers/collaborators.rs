//! Handlers for per-article collaborator grants.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quire_core::types::DbId;
use quire_db::models::collaborator::UpsertCollaborator;
use quire_db::workflow::ArticleWorkflow;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /articles/{id}/collaborators
pub async fn list_collaborators(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let collaborators = ArticleWorkflow::collaborators(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: collaborators,
    }))
}

/// PUT /articles/{id}/collaborators
pub async fn upsert_collaborator(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpsertCollaborator>,
) -> AppResult<impl IntoResponse> {
    let collaborator =
        ArticleWorkflow::upsert_collaborator(&state.pool, id, &input, auth.user_id).await?;
    Ok(Json(DataResponse { data: collaborator }))
}

/// DELETE /articles/{id}/collaborators/{user_id}
pub async fn remove_collaborator(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ArticleWorkflow::remove_collaborator(&state.pool, id, user_id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
