//! Per-article collaborator grants.

use quire_core::permissions::CollaboratorRole;
use quire_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `article_collaborators` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Collaborator {
    pub article_id: DbId,
    pub user_id: DbId,
    #[sqlx(try_from = "String")]
    pub role: CollaboratorRole,
    pub created_at: Timestamp,
}

/// Collaborator joined with the user's names, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CollaboratorInfo {
    pub user_id: DbId,
    pub username: String,
    pub display_name: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: CollaboratorRole,
    pub created_at: Timestamp,
}

/// DTO for granting or changing a collaborator role.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertCollaborator {
    pub user_id: DbId,
    /// `admin` (alias `owner`) or `moderator`.
    pub role: String,
}
