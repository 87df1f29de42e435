//! Version store primitives.
//!
//! These run on the caller's connection, which must be inside a transaction:
//! the allocation holds the article row lock until that transaction ends.

use quire_core::error::CoreError;
use quire_core::status::VersionStatus;
use quire_core::types::DbId;
use sqlx::PgConnection;

use crate::models::article_version::{ArticleVersion, NewVersion};
use crate::repositories::{ArticleRepo, ArticleVersionRepo};
use crate::workflow::{not_found, WorkflowResult};

/// A version created by [`create_version`] and the head observed when its
/// number was allocated.
#[derive(Debug)]
pub struct CreatedVersion {
    pub version: ArticleVersion,
    pub head: Option<DbId>,
}

/// Allocate the next number for `new.article_id` and insert the version.
///
/// A missing `base_version_id` defaults to the head observed under the
/// allocation lock.
pub async fn create_version(
    conn: &mut PgConnection,
    new: &NewVersion<'_>,
) -> WorkflowResult<CreatedVersion> {
    let allocation = ArticleRepo::allocate_version_number(&mut *conn, new.article_id)
        .await?
        .ok_or_else(|| not_found("article", new.article_id))?;

    let new = NewVersion {
        base_version_id: new.base_version_id.or(allocation.current_version_id),
        ..new.clone()
    };
    let version = ArticleVersionRepo::insert(&mut *conn, allocation.version_number, &new).await?;

    Ok(CreatedVersion {
        version,
        head: allocation.current_version_id,
    })
}

/// Publish a pending version and move the head to it.
///
/// `version` is the row as the caller observed it. The status change is
/// guarded by that observation and the head swap is a compare-and-swap
/// against `expected_head`. If another writer got there first the operation
/// fails with a retryable `Conflict`, and the caller's transaction must be
/// dropped so the status change is rolled back with it.
pub async fn publish_version(
    conn: &mut PgConnection,
    version: &ArticleVersion,
    expected_head: Option<DbId>,
    content: Option<&str>,
) -> WorkflowResult<ArticleVersion> {
    let next = version.status.transition(VersionStatus::Published)?;

    let published =
        ArticleVersionRepo::set_status(&mut *conn, version.id, version.status, next, content)
            .await?
            .ok_or_else(|| lost_race(version.id))?;

    swap_head(conn, published.article_id, expected_head, published.id).await?;
    Ok(published)
}

/// Move the head from `expected_head` to an already published version.
pub async fn swap_head(
    conn: &mut PgConnection,
    article_id: DbId,
    expected_head: Option<DbId>,
    new_head: DbId,
) -> WorkflowResult<()> {
    if ArticleRepo::swap_head(&mut *conn, article_id, expected_head, new_head).await? {
        Ok(())
    } else {
        Err(CoreError::Conflict(
            "The article's current version changed concurrently; retry the operation".into(),
        )
        .into())
    }
}

/// Reject a pending version. Terminal; the head is not touched.
pub async fn reject_version(
    conn: &mut PgConnection,
    version: &ArticleVersion,
) -> WorkflowResult<ArticleVersion> {
    let next = version.status.transition(VersionStatus::Rejected)?;

    let rejected = ArticleVersionRepo::set_status(conn, version.id, version.status, next, None)
        .await?
        .ok_or_else(|| lost_race(version.id))?;
    Ok(rejected)
}

fn lost_race(version_id: DbId) -> CoreError {
    CoreError::Conflict(format!(
        "Version {version_id} was changed concurrently; retry the operation"
    ))
}
