//! Repository for the `review_submissions` table.
//!
//! Every status change is guarded by the status the caller observed, so two
//! reviewers racing on the same submission cannot both apply a transition.

use quire_core::status::SubmissionStatus;
use quire_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::review_submission::ReviewSubmission;

const COLUMNS: &str = "id, article_id, proposed_version_id, base_version_id, submitted_by, \
    reviewed_by, status, review_notes, has_conflict, merge_result, created_at, reviewed_at";

pub struct ReviewSubmissionRepo;

impl ReviewSubmissionRepo {
    /// Open a `pending` submission for a freshly inserted pending version.
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        article_id: DbId,
        proposed_version_id: DbId,
        base_version_id: DbId,
        submitted_by: DbId,
    ) -> Result<ReviewSubmission, sqlx::Error> {
        let query = format!(
            "INSERT INTO review_submissions
                (article_id, proposed_version_id, base_version_id, submitted_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewSubmission>(&query)
            .bind(article_id)
            .bind(proposed_version_id)
            .bind(base_version_id)
            .bind(submitted_by)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<ReviewSubmission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM review_submissions WHERE id = $1");
        sqlx::query_as::<_, ReviewSubmission>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List submissions with optional status and article filters, newest
    /// first.
    pub async fn list(
        pool: &PgPool,
        status: Option<SubmissionStatus>,
        article_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReviewSubmission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM review_submissions
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::BIGINT IS NULL OR article_id = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, ReviewSubmission>(&query)
            .bind(status.map(SubmissionStatus::as_str))
            .bind(article_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Submissions on an article still waiting for a decision, oldest first.
    pub async fn list_actionable_for_article(
        executor: impl PgExecutor<'_>,
        article_id: DbId,
    ) -> Result<Vec<ReviewSubmission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM review_submissions
             WHERE article_id = $1 AND status IN ('pending', 'conflict_detected')
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ReviewSubmission>(&query)
            .bind(article_id)
            .fetch_all(executor)
            .await
    }

    /// Move `from` -> `conflict_detected` and record the best-effort merge.
    pub async fn mark_conflict(
        executor: impl PgExecutor<'_>,
        id: DbId,
        from: SubmissionStatus,
        merge_result: &str,
    ) -> Result<Option<ReviewSubmission>, sqlx::Error> {
        let query = format!(
            "UPDATE review_submissions SET
                status = 'conflict_detected',
                has_conflict = TRUE,
                merge_result = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewSubmission>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(merge_result)
            .fetch_optional(executor)
            .await
    }

    /// Replace the best-effort merge of a submission that is still in
    /// `conflict_detected` after the head moved again.
    pub async fn refresh_conflict(
        executor: impl PgExecutor<'_>,
        id: DbId,
        merge_result: &str,
    ) -> Result<Option<ReviewSubmission>, sqlx::Error> {
        let query = format!(
            "UPDATE review_submissions SET merge_result = $2
             WHERE id = $1 AND status = 'conflict_detected'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewSubmission>(&query)
            .bind(id)
            .bind(merge_result)
            .fetch_optional(executor)
            .await
    }

    /// Close a submission as `merged` or `rejected`, stamping the reviewer.
    ///
    /// Returns `None` if the submission is no longer in `from`.
    pub async fn complete(
        executor: impl PgExecutor<'_>,
        id: DbId,
        from: SubmissionStatus,
        to: SubmissionStatus,
        reviewed_by: DbId,
        notes: Option<&str>,
    ) -> Result<Option<ReviewSubmission>, sqlx::Error> {
        let query = format!(
            "UPDATE review_submissions SET
                status = $3,
                reviewed_by = $4,
                review_notes = $5,
                reviewed_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewSubmission>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .bind(reviewed_by)
            .bind(notes)
            .fetch_optional(executor)
            .await
    }
}
