//! Repository for the `article_collaborators` table.

use quire_core::permissions::CollaboratorRole;
use quire_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::collaborator::{Collaborator, CollaboratorInfo};

const COLUMNS: &str = "article_id, user_id, role, created_at";

pub struct CollaboratorRepo;

impl CollaboratorRepo {
    /// The explicit grant for a user on an article, if any.
    pub async fn find_role(
        executor: impl PgExecutor<'_>,
        article_id: DbId,
        user_id: DbId,
    ) -> Result<Option<CollaboratorRole>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM article_collaborators WHERE article_id = $1 AND user_id = $2"
        );
        let row = sqlx::query_as::<_, Collaborator>(&query)
            .bind(article_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await?;
        Ok(row.map(|c| c.role))
    }

    /// Grant a role, replacing any existing grant for the same user.
    pub async fn upsert(
        executor: impl PgExecutor<'_>,
        article_id: DbId,
        user_id: DbId,
        role: CollaboratorRole,
    ) -> Result<Collaborator, sqlx::Error> {
        let query = format!(
            "INSERT INTO article_collaborators (article_id, user_id, role)
             VALUES ($1, $2, $3)
             ON CONFLICT (article_id, user_id) DO UPDATE SET role = EXCLUDED.role
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Collaborator>(&query)
            .bind(article_id)
            .bind(user_id)
            .bind(role.as_str())
            .fetch_one(executor)
            .await
    }

    /// Remove a grant. Returns `true` if one existed.
    pub async fn remove(
        pool: &PgPool,
        article_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM article_collaborators WHERE article_id = $1 AND user_id = $2",
        )
        .bind(article_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_by_article(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Vec<CollaboratorInfo>, sqlx::Error> {
        sqlx::query_as::<_, CollaboratorInfo>(
            "SELECT c.user_id, u.username, u.display_name, c.role, c.created_at
             FROM article_collaborators c
             JOIN users u ON u.id = c.user_id
             WHERE c.article_id = $1
             ORDER BY c.created_at, c.user_id",
        )
        .bind(article_id)
        .fetch_all(pool)
        .await
    }
}
