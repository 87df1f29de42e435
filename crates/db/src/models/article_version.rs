//! Article version rows.
//!
//! Versions are immutable apart from `status`, and `content` which is
//! written once when a reviewer supplies a manual conflict resolution.

use quire_core::article::DiffLine;
use quire_core::status::VersionStatus;
use quire_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `article_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleVersion {
    pub id: DbId,
    pub article_id: DbId,
    pub version_number: i32,
    pub content: String,
    pub commit_message: String,
    pub author_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: VersionStatus,
    /// `None` only for version 1.
    pub base_version_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Version metadata without the body, for history listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VersionSummary {
    pub id: DbId,
    pub version_number: i32,
    pub commit_message: String,
    pub author_id: DbId,
    #[sqlx(try_from = "String")]
    pub status: VersionStatus,
    pub base_version_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Input for inserting a version once its number has been allocated.
#[derive(Debug, Clone)]
pub struct NewVersion<'a> {
    pub article_id: DbId,
    pub content: &'a str,
    pub commit_message: &'a str,
    pub author_id: DbId,
    pub base_version_id: Option<DbId>,
    pub status: VersionStatus,
}

/// A version next to the version it was written against.
#[derive(Debug, Serialize)]
pub struct VersionDiff {
    pub version: ArticleVersion,
    pub base: Option<ArticleVersion>,
    /// Line diff from `base` (or from empty text for version 1).
    pub lines: Vec<DiffLine>,
}
