//! Repository for the `version_conflicts` audit table.

use quire_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::version_conflict::VersionConflict;

const COLUMNS: &str = "id, submission_id, conflict_with_version_id, status, conflict_details, \
    resolved_version_id, resolved_by, resolved_at, created_at";

pub struct VersionConflictRepo;

impl VersionConflictRepo {
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        submission_id: DbId,
        conflict_with_version_id: DbId,
        details: &str,
    ) -> Result<VersionConflict, sqlx::Error> {
        let query = format!(
            "INSERT INTO version_conflicts (submission_id, conflict_with_version_id, conflict_details)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VersionConflict>(&query)
            .bind(submission_id)
            .bind(conflict_with_version_id)
            .bind(details)
            .fetch_one(executor)
            .await
    }

    /// Mark every open conflict of a submission as resolved by
    /// `resolved_version_id`. Returns the number of rows touched.
    pub async fn resolve_for_submission(
        executor: impl PgExecutor<'_>,
        submission_id: DbId,
        resolved_version_id: DbId,
        resolved_by: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE version_conflicts SET
                status = 'resolved',
                resolved_version_id = $2,
                resolved_by = $3,
                resolved_at = NOW()
             WHERE submission_id = $1 AND status = 'detected'",
        )
        .bind(submission_id)
        .bind(resolved_version_id)
        .bind(resolved_by)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_by_submission(
        pool: &PgPool,
        submission_id: DbId,
    ) -> Result<Vec<VersionConflict>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM version_conflicts
             WHERE submission_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, VersionConflict>(&query)
            .bind(submission_id)
            .fetch_all(pool)
            .await
    }
}
