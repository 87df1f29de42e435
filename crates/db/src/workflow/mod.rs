//! Transactional operations composed from the repositories.
//!
//! - [`store`] -- version store primitives: allocate-and-insert, publish
//!   (status change plus head swap) and reject.
//! - [`articles`] -- article lifecycle, views, metadata and collaborators.
//! - [`review`] -- submission intake and the review state machine.
//!
//! Every operation that writes more than one row runs in a single
//! transaction. Returning early with an error drops the transaction, which
//! rolls it back.

use quire_core::error::CoreError;
use quire_core::permissions::{resolve_article_role, ArticleRole};
use quire_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::article::Article;
use crate::repositories::CollaboratorRepo;

pub mod articles;
pub mod review;
pub mod store;

pub use articles::ArticleWorkflow;
pub use review::ReviewWorkflow;

/// Error type shared by all workflow operations.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Resolve the caller's article-local role.
///
/// The global identity role is never consulted here.
pub async fn effective_role(
    executor: impl PgExecutor<'_>,
    article: &Article,
    user_id: DbId,
) -> Result<ArticleRole, sqlx::Error> {
    if user_id == article.created_by {
        return Ok(ArticleRole::Author);
    }
    let grant = CollaboratorRepo::find_role(executor, article.id, user_id).await?;
    Ok(resolve_article_role(article.created_by, user_id, grant))
}

pub(crate) fn not_found(entity: &'static str, id: DbId) -> WorkflowError {
    CoreError::NotFound { entity, id }.into()
}
