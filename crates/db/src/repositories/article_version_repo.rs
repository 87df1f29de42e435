//! Repository for the `article_versions` table.

use quire_core::status::VersionStatus;
use quire_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::article_version::{ArticleVersion, NewVersion, VersionSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, article_id, version_number, content, commit_message, \
    author_id, status, base_version_id, created_at";

const SUMMARY_COLUMNS: &str = "id, version_number, commit_message, author_id, \
    status, base_version_id, created_at";

pub struct ArticleVersionRepo;

impl ArticleVersionRepo {
    /// Insert a version under a number obtained from
    /// [`ArticleRepo::allocate_version_number`](crate::repositories::ArticleRepo::allocate_version_number)
    /// in the same transaction.
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        version_number: i32,
        input: &NewVersion<'_>,
    ) -> Result<ArticleVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO article_versions
                (article_id, version_number, content, commit_message, author_id, status, base_version_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArticleVersion>(&query)
            .bind(input.article_id)
            .bind(version_number)
            .bind(input.content)
            .bind(input.commit_message)
            .bind(input.author_id)
            .bind(input.status.as_str())
            .bind(input.base_version_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<ArticleVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM article_versions WHERE id = $1");
        sqlx::query_as::<_, ArticleVersion>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a version only if it belongs to `article_id`.
    pub async fn find_for_article(
        executor: impl PgExecutor<'_>,
        article_id: DbId,
        id: DbId,
    ) -> Result<Option<ArticleVersion>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM article_versions WHERE id = $1 AND article_id = $2");
        sqlx::query_as::<_, ArticleVersion>(&query)
            .bind(id)
            .bind(article_id)
            .fetch_optional(executor)
            .await
    }

    /// Version history of an article, newest first, without bodies.
    pub async fn list_by_article(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Vec<VersionSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM article_versions
             WHERE article_id = $1
             ORDER BY version_number DESC"
        );
        sqlx::query_as::<_, VersionSummary>(&query)
            .bind(article_id)
            .fetch_all(pool)
            .await
    }

    /// Move a version from `from` to `to`, optionally replacing its content.
    ///
    /// Guarded by the current status, so a version that already left `from`
    /// is not touched and `None` is returned. Callers validate the
    /// transition itself with [`VersionStatus::transition`].
    pub async fn set_status(
        executor: impl PgExecutor<'_>,
        id: DbId,
        from: VersionStatus,
        to: VersionStatus,
        content: Option<&str>,
    ) -> Result<Option<ArticleVersion>, sqlx::Error> {
        let query = format!(
            "UPDATE article_versions SET
                status = $3,
                content = COALESCE($4, content)
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArticleVersion>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .bind(content)
            .fetch_optional(executor)
            .await
    }
}
