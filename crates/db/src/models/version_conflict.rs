//! Conflict audit rows. Written by the review workflow, never read back
//! into its decisions.

use quire_core::status::ConflictStatus;
use quire_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `version_conflicts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VersionConflict {
    pub id: DbId,
    pub submission_id: DbId,
    pub conflict_with_version_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: ConflictStatus,
    pub conflict_details: Option<String>,
    pub resolved_version_id: Option<DbId>,
    pub resolved_by: Option<DbId>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
