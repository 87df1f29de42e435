//! Handlers for articles: creation, listing, the reader view, metadata,
//! deletion, history and edit submission.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use quire_core::types::DbId;
use quire_db::models::article::{Article, CreateArticle, ListArticlesParams, UpdateArticle};
use quire_db::models::article_version::ArticleVersion;
use quire_db::models::review_submission::SubmitEdit;
use quire_db::workflow::{ArticleWorkflow, ReviewWorkflow};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for `POST /articles`.
#[derive(Debug, Serialize)]
pub struct CreatedArticle {
    pub article: Article,
    pub version: ArticleVersion,
}

/// GET /articles
///
/// List articles, optionally within one module.
pub async fn list_articles(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListArticlesParams>,
) -> AppResult<impl IntoResponse> {
    let articles = ArticleWorkflow::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// POST /articles
///
/// Create an article with version 1 published.
pub async fn create_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateArticle>,
) -> AppResult<impl IntoResponse> {
    let (article, version) = ArticleWorkflow::create(&state.pool, &input, auth.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedArticle { article, version },
        }),
    ))
}

/// GET /articles/{id}
///
/// Current content, tags, open submissions and the caller's role.
pub async fn get_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let view = ArticleWorkflow::view(&state.pool, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /articles/{id}
pub async fn update_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateArticle>,
) -> AppResult<impl IntoResponse> {
    let article = ArticleWorkflow::update_metadata(&state.pool, id, &input, auth.user_id).await?;
    Ok(Json(DataResponse { data: article }))
}

/// DELETE /articles/{id}
pub async fn delete_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ArticleWorkflow::delete(&state.pool, id, auth.user_id, auth.global_role()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /articles/{id}/versions
pub async fn list_versions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let versions = ArticleWorkflow::versions(&state.pool, id).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// POST /articles/{id}/submissions
///
/// Propose an edit. Returns `published: true` when it went live directly.
pub async fn submit_edit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitEdit>,
) -> AppResult<impl IntoResponse> {
    let outcome = ReviewWorkflow::submit(&state.pool, id, &input, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}
