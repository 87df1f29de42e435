use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use quire_core::types::DbId;
use quire_db::workflow::ArticleWorkflow;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /versions/{id}/diff
///
/// The version, its base, and a line diff between the two.
pub async fn get_version_diff(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let diff = ArticleWorkflow::version_diff(&state.pool, id).await?;
    Ok(Json(DataResponse { data: diff }))
}
