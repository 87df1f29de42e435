//! Article lifecycle, reader views, metadata and collaborator management.

use quire_core::article::{
    clamp_limit, clamp_offset, compute_line_diff, normalize_commit_message, validate_content,
    validate_title, INITIAL_COMMIT_MESSAGE,
};
use quire_core::error::CoreError;
use quire_core::permissions::{can_delete_article, Capability, CollaboratorRole, GlobalRole};
use quire_core::tags::normalize_tags;
use quire_core::types::DbId;
use sqlx::PgPool;

use crate::models::article::{
    Article, ArticleView, CreateArticle, ListArticlesParams, UpdateArticle,
};
use crate::models::article_version::{ArticleVersion, VersionDiff, VersionSummary};
use crate::models::collaborator::{Collaborator, CollaboratorInfo, UpsertCollaborator};
use crate::repositories::{
    ArticleRepo, ArticleVersionRepo, CollaboratorRepo, ReviewSubmissionRepo,
};
use crate::workflow::{effective_role, not_found, WorkflowResult};

pub struct ArticleWorkflow;

impl ArticleWorkflow {
    /// Create an article with its first version published and the creator
    /// registered as an `admin` collaborator.
    pub async fn create(
        pool: &PgPool,
        input: &CreateArticle,
        user_id: DbId,
    ) -> WorkflowResult<(Article, ArticleVersion)> {
        validate_title(&input.title)?;
        validate_content(&input.content)?;
        let tags = normalize_tags(&input.tags)?;
        let commit_message = match input.commit_message.as_deref().map(str::trim) {
            None | Some("") => INITIAL_COMMIT_MESSAGE.to_string(),
            Some(message) => normalize_commit_message(Some(message))?,
        };

        let (article, version) =
            ArticleRepo::create(pool, input, &tags, &commit_message, user_id).await?;

        tracing::info!(
            user_id,
            article_id = article.id,
            module_id = article.module_id,
            "Article created",
        );
        Ok((article, version))
    }

    pub async fn list(pool: &PgPool, params: &ListArticlesParams) -> WorkflowResult<Vec<Article>> {
        let limit = clamp_limit(params.limit);
        let offset = clamp_offset(params.offset);
        Ok(ArticleRepo::list(pool, params.module_id, limit, offset).await?)
    }

    /// Load everything needed to display an article and count the view.
    pub async fn view(
        pool: &PgPool,
        article_id: DbId,
        user_id: DbId,
    ) -> WorkflowResult<ArticleView> {
        let article = find_article(pool, article_id).await?;
        let head_id = article.current_version_id.ok_or_else(|| {
            CoreError::Internal(format!("Article {article_id} has no current version"))
        })?;
        let head = ArticleVersionRepo::find_by_id(pool, head_id)
            .await?
            .ok_or_else(|| not_found("version", head_id))?;

        let pending_submissions =
            ReviewSubmissionRepo::list_actionable_for_article(pool, article_id).await?;
        let my_role = effective_role(pool, &article, user_id).await?;

        ArticleRepo::increment_view_count(pool, article_id).await?;

        Ok(ArticleView {
            tags: article.tags.0.clone(),
            content: head.content,
            version_number: head.version_number,
            pending_submissions,
            my_role,
            article,
        })
    }

    /// Update title, tags or the review flag. Requires `EditMetadata`.
    pub async fn update_metadata(
        pool: &PgPool,
        article_id: DbId,
        input: &UpdateArticle,
        user_id: DbId,
    ) -> WorkflowResult<Article> {
        if let Some(title) = &input.title {
            validate_title(title)?;
        }
        let tags = input.tags.as_deref().map(normalize_tags).transpose()?;

        let article = find_article(pool, article_id).await?;
        effective_role(pool, &article, user_id)
            .await?
            .require(Capability::EditMetadata)?;

        let updated = ArticleRepo::update_metadata(
            pool,
            article_id,
            input.title.as_deref().map(str::trim),
            tags.as_deref(),
            input.is_review_required,
        )
        .await?
        .ok_or_else(|| not_found("article", article_id))?;

        tracing::info!(user_id, article_id, "Article metadata updated");
        Ok(updated)
    }

    /// Delete an article. Allowed for roles with `Delete` and for global
    /// administrators.
    pub async fn delete(
        pool: &PgPool,
        article_id: DbId,
        user_id: DbId,
        global_role: GlobalRole,
    ) -> WorkflowResult<()> {
        let article = find_article(pool, article_id).await?;
        let role = effective_role(pool, &article, user_id).await?;
        if !can_delete_article(role, global_role) {
            return Err(CoreError::Forbidden(format!(
                "Role '{role}' may not delete this article"
            ))
            .into());
        }

        if !ArticleRepo::delete(pool, article_id).await? {
            return Err(not_found("article", article_id));
        }

        tracing::info!(user_id, article_id, "Article deleted");
        Ok(())
    }

    /// Version history, newest first.
    pub async fn versions(pool: &PgPool, article_id: DbId) -> WorkflowResult<Vec<VersionSummary>> {
        find_article(pool, article_id).await?;
        Ok(ArticleVersionRepo::list_by_article(pool, article_id).await?)
    }

    /// A version, the version it was based on, and a line diff between them.
    pub async fn version_diff(pool: &PgPool, version_id: DbId) -> WorkflowResult<VersionDiff> {
        let version = ArticleVersionRepo::find_by_id(pool, version_id)
            .await?
            .ok_or_else(|| not_found("version", version_id))?;

        let base = match version.base_version_id {
            Some(base_id) => ArticleVersionRepo::find_by_id(pool, base_id).await?,
            None => None,
        };

        let old = base.as_ref().map(|b| b.content.as_str()).unwrap_or_default();
        let lines = compute_line_diff(old, &version.content)?;

        Ok(VersionDiff {
            version,
            base,
            lines,
        })
    }

    // ── Collaborators ────────────────────────────────────────────────

    pub async fn collaborators(
        pool: &PgPool,
        article_id: DbId,
    ) -> WorkflowResult<Vec<CollaboratorInfo>> {
        find_article(pool, article_id).await?;
        Ok(CollaboratorRepo::list_by_article(pool, article_id).await?)
    }

    /// Grant or change a collaborator role. Requires `ManageCollaborators`.
    pub async fn upsert_collaborator(
        pool: &PgPool,
        article_id: DbId,
        input: &UpsertCollaborator,
        user_id: DbId,
    ) -> WorkflowResult<Collaborator> {
        let role: CollaboratorRole = input.role.parse()?;

        let article = find_article(pool, article_id).await?;
        effective_role(pool, &article, user_id)
            .await?
            .require(Capability::ManageCollaborators)?;

        if input.user_id == article.created_by {
            return Err(CoreError::Validation("The author's role cannot be changed".into()).into());
        }

        let collaborator = CollaboratorRepo::upsert(pool, article_id, input.user_id, role).await?;

        tracing::info!(
            user_id,
            article_id,
            collaborator_id = input.user_id,
            role = role.as_str(),
            "Collaborator added",
        );
        Ok(collaborator)
    }

    /// Remove a collaborator grant. Requires `ManageCollaborators`.
    pub async fn remove_collaborator(
        pool: &PgPool,
        article_id: DbId,
        collaborator_id: DbId,
        user_id: DbId,
    ) -> WorkflowResult<()> {
        let article = find_article(pool, article_id).await?;
        effective_role(pool, &article, user_id)
            .await?
            .require(Capability::ManageCollaborators)?;

        if collaborator_id == article.created_by {
            return Err(CoreError::Validation("The author cannot be removed".into()).into());
        }

        if !CollaboratorRepo::remove(pool, article_id, collaborator_id).await? {
            return Err(not_found("collaborator", collaborator_id));
        }

        tracing::info!(user_id, article_id, collaborator_id, "Collaborator removed");
        Ok(())
    }
}

async fn find_article(pool: &PgPool, article_id: DbId) -> WorkflowResult<Article> {
    ArticleRepo::find_by_id(pool, article_id)
        .await?
        .ok_or_else(|| not_found("article", article_id))
}
