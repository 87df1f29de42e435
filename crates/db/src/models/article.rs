//! Article rows, request DTOs and the composite article view.

use quire_core::permissions::ArticleRole;
use quire_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::review_submission::ReviewSubmission;

/// A row from the `articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    /// Head pointer; always a `published` version of this article once set.
    pub current_version_id: Option<DbId>,
    pub title: String,
    pub module_id: DbId,
    pub created_by: DbId,
    pub is_review_required: bool,
    pub view_count: i64,
    pub tags: Json<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an article together with its first version.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticle {
    pub title: String,
    pub module_id: DbId,
    #[serde(default)]
    pub content: String,
    pub commit_message: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Defaults to `true`.
    pub review_required: Option<bool>,
}

/// DTO for metadata edits. Content never changes through this path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_review_required: Option<bool>,
}

/// Query params for listing articles in a module.
#[derive(Debug, Clone, Deserialize)]
pub struct ListArticlesParams {
    pub module_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Everything a reader needs to display an article.
#[derive(Debug, Serialize)]
pub struct ArticleView {
    pub article: Article,
    pub content: String,
    pub version_number: i32,
    pub tags: Vec<String>,
    pub pending_submissions: Vec<ReviewSubmission>,
    /// The caller's effective role on this article.
    pub my_role: ArticleRole,
}
