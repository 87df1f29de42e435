//! Repository for the `articles` table.
//!
//! Owns the two concurrency-sensitive writes on an article row: version
//! number allocation and the head swap.

use quire_core::permissions::CollaboratorRole;
use quire_core::status::VersionStatus;
use quire_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::article::{Article, CreateArticle};
use crate::models::article_version::{ArticleVersion, NewVersion};
use crate::repositories::{ArticleVersionRepo, CollaboratorRepo};

/// Column list for `articles` queries.
const COLUMNS: &str = "id, current_version_id, title, module_id, created_by, \
    is_review_required, view_count, tags, created_at, updated_at";

/// A freshly allocated version number and the head observed under the same
/// row lock.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct Allocation {
    pub version_number: i32,
    pub current_version_id: Option<DbId>,
}

pub struct ArticleRepo;

impl ArticleRepo {
    /// Create an article with version 1 already published.
    ///
    /// In one transaction: insert the article, allocate and insert the first
    /// version, point the head at it and register the creator as an `admin`
    /// collaborator.
    pub async fn create(
        pool: &PgPool,
        input: &CreateArticle,
        tags: &[String],
        commit_message: &str,
        user_id: DbId,
    ) -> Result<(Article, ArticleVersion), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let article_id: DbId = sqlx::query_scalar(
            "INSERT INTO articles (title, module_id, created_by, is_review_required, tags)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(input.title.trim())
        .bind(input.module_id)
        .bind(user_id)
        .bind(input.review_required.unwrap_or(true))
        .bind(Json(tags))
        .fetch_one(&mut *tx)
        .await?;

        let allocation = Self::allocate_version_number(&mut tx, article_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let version = ArticleVersionRepo::insert(
            &mut *tx,
            allocation.version_number,
            &NewVersion {
                article_id,
                content: &input.content,
                commit_message,
                author_id: user_id,
                base_version_id: None,
                status: VersionStatus::Published,
            },
        )
        .await?;

        if !Self::swap_head(&mut *tx, article_id, None, version.id).await? {
            return Err(sqlx::Error::RowNotFound);
        }

        CollaboratorRepo::upsert(&mut *tx, article_id, user_id, CollaboratorRole::Admin).await?;

        let article = Self::find_by_id(&mut *tx, article_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        tx.commit().await?;
        Ok((article, version))
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List articles, optionally restricted to a module, newest first.
    pub async fn list(
        pool: &PgPool,
        module_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM articles
             WHERE ($1::BIGINT IS NULL OR module_id = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(module_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update title, tags and the review flag. Only non-`None` values apply.
    pub async fn update_metadata(
        pool: &PgPool,
        id: DbId,
        title: Option<&str>,
        tags: Option<&[String]>,
        is_review_required: Option<bool>,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                title = COALESCE($2, title),
                tags = COALESCE($3, tags),
                is_review_required = COALESCE($4, is_review_required)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(title)
            .bind(tags.map(Json))
            .bind(is_review_required)
            .fetch_optional(pool)
            .await
    }

    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete an article; versions, submissions and grants cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Version store primitives ─────────────────────────────────────

    /// Allocate the next version number for an article.
    ///
    /// A single-row `UPDATE` takes the article's row lock, so concurrent
    /// allocations for the same article are serialized and never observe the
    /// same number. The lock is held until the caller's transaction ends,
    /// which also makes the returned head stable for that transaction.
    ///
    /// Returns `None` if the article does not exist.
    pub async fn allocate_version_number(
        conn: &mut PgConnection,
        article_id: DbId,
    ) -> Result<Option<Allocation>, sqlx::Error> {
        sqlx::query_as::<_, Allocation>(
            "UPDATE articles SET last_version_number = last_version_number + 1
             WHERE id = $1
             RETURNING last_version_number AS version_number, current_version_id",
        )
        .bind(article_id)
        .fetch_optional(conn)
        .await
    }

    /// Compare-and-swap the head pointer.
    ///
    /// Succeeds only if the head still equals `expected`. Returns `false`
    /// when another writer moved it first.
    pub async fn swap_head(
        executor: impl PgExecutor<'_>,
        article_id: DbId,
        expected: Option<DbId>,
        new_head: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE articles SET current_version_id = $3
             WHERE id = $1 AND current_version_id IS NOT DISTINCT FROM $2",
        )
        .bind(article_id)
        .bind(expected)
        .bind(new_head)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
