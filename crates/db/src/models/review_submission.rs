//! Review submission rows, request DTOs and workflow responses.

use quire_core::review::ConflictPayload;
use quire_core::status::SubmissionStatus;
use quire_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::article_version::ArticleVersion;

/// A row from the `review_submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewSubmission {
    pub id: DbId,
    pub article_id: DbId,
    pub proposed_version_id: DbId,
    pub base_version_id: DbId,
    pub submitted_by: DbId,
    pub reviewed_by: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub status: SubmissionStatus,
    pub review_notes: Option<String>,
    pub has_conflict: bool,
    /// Conflict-marked content recorded when a conflict was detected.
    pub merge_result: Option<String>,
    pub created_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
}

/// DTO for proposing an edit to an article.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitEdit {
    pub content: String,
    pub commit_message: Option<String>,
    /// The version the edit was written against. Defaults to the head.
    pub base_version_id: Option<DbId>,
}

/// DTO for a review action.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    /// `approve` or `reject`.
    pub action: String,
    pub notes: Option<String>,
    /// Manual resolution for a conflicted submission.
    pub merged_content: Option<String>,
}

/// Query params for listing submissions.
#[derive(Debug, Clone, Deserialize)]
pub struct ListSubmissionsParams {
    pub status: Option<String>,
    pub article_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A submission with both version bodies.
#[derive(Debug, Serialize)]
pub struct SubmissionDetail {
    pub submission: ReviewSubmission,
    pub proposed_version: ArticleVersion,
    pub base_version: ArticleVersion,
    pub submitter_name: String,
}

/// Result of `Submit`.
#[derive(Debug, Serialize)]
pub struct SubmitOutcome {
    /// `true` when the edit went live without review.
    pub published: bool,
    pub submission: Option<ReviewSubmission>,
    pub published_version: Option<ArticleVersion>,
}

/// Normal completion of a review action.
#[derive(Debug, Serialize)]
pub struct ReviewCompleted {
    pub message: String,
    pub submission: ReviewSubmission,
    pub published_version: Option<ArticleVersion>,
}

/// Result of `Review`: either completed, or a conflict handed back for
/// manual resolution.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReviewOutcome {
    Completed(ReviewCompleted),
    Conflict(ConflictPayload),
}
