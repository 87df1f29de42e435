//! Repository for the `users` table.

use quire_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::user::{CreateUser, User};

const COLUMNS: &str = "id, username, display_name, created_at";

pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, display_name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Display name for a user, falling back to `user #<id>` for ids the
    /// identity projection does not know about.
    pub async fn display_name(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<String, sqlx::Error> {
        Ok(Self::find_by_id(executor, id)
            .await?
            .map(|u| u.name().to_string())
            .unwrap_or_else(|| format!("user #{id}")))
    }
}
