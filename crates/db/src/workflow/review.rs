//! Submission intake and the review state machine.

use quire_core::article::{clamp_limit, clamp_offset, normalize_commit_message, validate_content};
use quire_core::error::CoreError;
use quire_core::review::{
    authorize_review, plan_approval, plan_intake, ApprovalPlan, ConflictPayload, IntakeDecision,
    ReviewAction, ReviewContext, Snapshots, WITHDRAWN_NOTE,
};
use quire_core::status::{SubmissionStatus, VersionStatus};
use quire_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::article::Article;
use crate::models::article_version::{ArticleVersion, NewVersion};
use crate::models::review_submission::{
    ListSubmissionsParams, ReviewCompleted, ReviewOutcome, ReviewRequest, ReviewSubmission,
    SubmissionDetail, SubmitEdit, SubmitOutcome,
};
use crate::models::version_conflict::VersionConflict;
use crate::repositories::{
    ArticleRepo, ArticleVersionRepo, ReviewSubmissionRepo, UserRepo, VersionConflictRepo,
};
use crate::workflow::store::{create_version, publish_version, reject_version, swap_head};
use crate::workflow::{effective_role, not_found, WorkflowResult};

pub struct ReviewWorkflow;

impl ReviewWorkflow {
    /// Propose an edit to an article.
    ///
    /// Publishes immediately when the article does not require review or the
    /// caller's article role may submit directly. Otherwise creates a pending
    /// version and a submission awaiting review.
    pub async fn submit(
        pool: &PgPool,
        article_id: DbId,
        input: &SubmitEdit,
        user_id: DbId,
    ) -> WorkflowResult<SubmitOutcome> {
        validate_content(&input.content)?;
        let commit_message = normalize_commit_message(input.commit_message.as_deref())?;

        let mut tx = pool.begin().await?;

        let article = ArticleRepo::find_by_id(&mut *tx, article_id)
            .await?
            .ok_or_else(|| not_found("article", article_id))?;

        if let Some(base_id) = input.base_version_id {
            let base = ArticleVersionRepo::find_for_article(&mut *tx, article_id, base_id)
                .await?
                .ok_or_else(|| {
                    CoreError::Validation(format!(
                        "Base version {base_id} does not belong to article {article_id}"
                    ))
                })?;
            if base.status != VersionStatus::Published {
                return Err(CoreError::Validation(format!(
                    "Base version {base_id} is {}, not published",
                    base.status
                ))
                .into());
            }
        }

        let role = effective_role(&mut *tx, &article, user_id).await?;
        let decision = plan_intake(article.is_review_required, role);
        let status = match decision {
            IntakeDecision::Publish => VersionStatus::Published,
            IntakeDecision::Queue => VersionStatus::Pending,
        };

        let created = create_version(
            &mut tx,
            &NewVersion {
                article_id,
                content: &input.content,
                commit_message: &commit_message,
                author_id: user_id,
                base_version_id: input.base_version_id,
                status,
            },
        )
        .await?;
        let version = created.version;

        let base_version_id = version.base_version_id.ok_or_else(|| {
            CoreError::Internal(format!("Article {article_id} has no current version"))
        })?;

        match decision {
            IntakeDecision::Publish => {
                swap_head(&mut tx, article_id, created.head, version.id).await?;
                tx.commit().await?;

                tracing::info!(
                    user_id,
                    article_id,
                    version_number = version.version_number,
                    role = %role,
                    "Edit published directly",
                );

                Ok(SubmitOutcome {
                    published: true,
                    submission: None,
                    published_version: Some(version),
                })
            }
            IntakeDecision::Queue => {
                let submission = ReviewSubmissionRepo::insert(
                    &mut *tx,
                    article_id,
                    version.id,
                    base_version_id,
                    user_id,
                )
                .await?;
                tx.commit().await?;

                tracing::info!(
                    user_id,
                    article_id,
                    submission_id = submission.id,
                    version_number = version.version_number,
                    "Submission created",
                );

                Ok(SubmitOutcome {
                    published: false,
                    submission: Some(submission),
                    published_version: None,
                })
            }
        }
    }

    /// Approve or reject a submission.
    ///
    /// An approval whose merge conflicts returns [`ReviewOutcome::Conflict`]
    /// and leaves the submission in `conflict_detected`. Calling again with
    /// `merged_content` set completes it.
    pub async fn review(
        pool: &PgPool,
        submission_id: DbId,
        reviewer_id: DbId,
        input: &ReviewRequest,
    ) -> WorkflowResult<ReviewOutcome> {
        let action: ReviewAction = input.action.parse()?;
        if let Some(content) = &input.merged_content {
            validate_content(content)?;
        }

        let mut tx = pool.begin().await?;

        let submission = ReviewSubmissionRepo::find_by_id(&mut *tx, submission_id)
            .await?
            .ok_or_else(|| not_found("submission", submission_id))?;
        let article = ArticleRepo::find_by_id(&mut *tx, submission.article_id)
            .await?
            .ok_or_else(|| not_found("article", submission.article_id))?;

        let ctx = ReviewContext {
            status: submission.status,
            submitted_by: submission.submitted_by,
            reviewer_id,
            reviewer_role: effective_role(&mut *tx, &article, reviewer_id).await?,
            review_required: article.is_review_required,
        };
        authorize_review(&ctx, action)?;

        let outcome = match action {
            ReviewAction::Reject => {
                let submission =
                    reject(&mut tx, &submission, reviewer_id, input.notes.as_deref()).await?;
                tracing::info!(
                    reviewer_id,
                    article_id = article.id,
                    submission_id,
                    "Submission rejected",
                );
                ReviewOutcome::Completed(ReviewCompleted {
                    message: "Submission rejected".into(),
                    submission,
                    published_version: None,
                })
            }
            ReviewAction::Approve => {
                approve(
                    &mut tx,
                    &article,
                    &submission,
                    reviewer_id,
                    input.notes.as_deref(),
                    input.merged_content.as_deref(),
                )
                .await?
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Withdraw one's own submission. Recorded as a rejection.
    pub async fn withdraw(
        pool: &PgPool,
        submission_id: DbId,
        user_id: DbId,
    ) -> WorkflowResult<ReviewSubmission> {
        let mut tx = pool.begin().await?;

        let submission = ReviewSubmissionRepo::find_by_id(&mut *tx, submission_id)
            .await?
            .ok_or_else(|| not_found("submission", submission_id))?;

        if submission.submitted_by != user_id {
            return Err(CoreError::Forbidden(
                "Only the submitter may withdraw a submission".into(),
            )
            .into());
        }

        let submission = reject(&mut tx, &submission, user_id, Some(WITHDRAWN_NOTE)).await?;
        tx.commit().await?;

        tracing::info!(
            user_id,
            article_id = submission.article_id,
            submission_id,
            "Submission withdrawn",
        );
        Ok(submission)
    }

    /// List submissions, optionally filtered by status and article.
    pub async fn list(
        pool: &PgPool,
        params: &ListSubmissionsParams,
    ) -> WorkflowResult<Vec<ReviewSubmission>> {
        let status = params
            .status
            .as_deref()
            .map(str::parse::<SubmissionStatus>)
            .transpose()?;
        Ok(ReviewSubmissionRepo::list(
            pool,
            status,
            params.article_id,
            clamp_limit(params.limit),
            clamp_offset(params.offset),
        )
        .await?)
    }

    /// Conflict audit rows recorded for a submission.
    pub async fn conflicts(
        pool: &PgPool,
        submission_id: DbId,
    ) -> WorkflowResult<Vec<VersionConflict>> {
        ReviewSubmissionRepo::find_by_id(pool, submission_id)
            .await?
            .ok_or_else(|| not_found("submission", submission_id))?;
        Ok(VersionConflictRepo::list_by_submission(pool, submission_id).await?)
    }

    /// A submission with both version bodies and the submitter's name.
    pub async fn detail(pool: &PgPool, submission_id: DbId) -> WorkflowResult<SubmissionDetail> {
        let submission = ReviewSubmissionRepo::find_by_id(pool, submission_id)
            .await?
            .ok_or_else(|| not_found("submission", submission_id))?;
        let proposed_version = load_version(pool, submission.proposed_version_id).await?;
        let base_version = load_version(pool, submission.base_version_id).await?;
        let submitter_name = UserRepo::display_name(pool, submission.submitted_by).await?;

        Ok(SubmissionDetail {
            submission,
            proposed_version,
            base_version,
            submitter_name,
        })
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Close the submission as `rejected` and reject its proposed version.
async fn reject(
    conn: &mut PgConnection,
    submission: &ReviewSubmission,
    reviewer_id: DbId,
    notes: Option<&str>,
) -> WorkflowResult<ReviewSubmission> {
    let next = submission.status.transition(SubmissionStatus::Rejected)?;

    let rejected = ReviewSubmissionRepo::complete(
        &mut *conn,
        submission.id,
        submission.status,
        next,
        reviewer_id,
        notes,
    )
    .await?
    .ok_or_else(|| lost_review_race(submission.id))?;

    let proposed = load_version(&mut *conn, submission.proposed_version_id).await?;
    reject_version(conn, &proposed).await?;

    Ok(rejected)
}

async fn approve(
    conn: &mut PgConnection,
    article: &Article,
    submission: &ReviewSubmission,
    reviewer_id: DbId,
    notes: Option<&str>,
    resolution: Option<&str>,
) -> WorkflowResult<ReviewOutcome> {
    let head_id = article.current_version_id.ok_or_else(|| {
        CoreError::Internal(format!("Article {} has no current version", article.id))
    })?;

    let base = load_version(&mut *conn, submission.base_version_id).await?;
    let theirs = load_version(&mut *conn, submission.proposed_version_id).await?;
    let ours = load_version(&mut *conn, head_id).await?;

    let plan = plan_approval(
        Snapshots {
            base: &base.content,
            theirs: &theirs.content,
            ours: &ours.content,
        },
        resolution,
    );

    match plan {
        ApprovalPlan::Conflict { best_effort } => {
            record_conflict(&mut *conn, submission, &base, &ours, &best_effort).await?;

            tracing::warn!(
                reviewer_id,
                article_id = article.id,
                submission_id = submission.id,
                base_version_number = base.version_number,
                current_version_number = ours.version_number,
                "Merge conflict detected",
            );

            Ok(ReviewOutcome::Conflict(ConflictPayload {
                submission_id: submission.id,
                base_content: base.content,
                their_content: theirs.content,
                our_content: ours.content,
                has_conflict: true,
                base_version_number: base.version_number,
                current_version_number: ours.version_number,
                submitter_name: UserRepo::display_name(&mut *conn, submission.submitted_by)
                    .await?,
            }))
        }
        ApprovalPlan::Merge { content, manual } => {
            let next = submission.status.transition(SubmissionStatus::Merged)?;
            let merged = ReviewSubmissionRepo::complete(
                &mut *conn,
                submission.id,
                submission.status,
                next,
                reviewer_id,
                notes,
            )
            .await?
            .ok_or_else(|| lost_review_race(submission.id))?;

            let replacement = (content != theirs.content).then_some(content.as_str());
            let version = publish_version(&mut *conn, &theirs, Some(ours.id), replacement).await?;

            if submission.status == SubmissionStatus::ConflictDetected {
                VersionConflictRepo::resolve_for_submission(
                    &mut *conn,
                    submission.id,
                    version.id,
                    reviewer_id,
                )
                .await?;
            }

            tracing::info!(
                reviewer_id,
                article_id = article.id,
                submission_id = submission.id,
                version_number = version.version_number,
                manual,
                "Submission merged",
            );

            let message = if manual {
                "Submission merged with manual resolution"
            } else {
                "Submission merged"
            };
            Ok(ReviewOutcome::Completed(ReviewCompleted {
                message: message.into(),
                submission: merged,
                published_version: Some(version),
            }))
        }
    }
}

/// Move a pending submission to `conflict_detected` and open an audit row.
///
/// A submission already in `conflict_detected` only gets its best-effort
/// merge refreshed against the current head.
async fn record_conflict(
    conn: &mut PgConnection,
    submission: &ReviewSubmission,
    base: &ArticleVersion,
    ours: &ArticleVersion,
    best_effort: &str,
) -> WorkflowResult<ReviewSubmission> {
    if submission.status == SubmissionStatus::ConflictDetected {
        return ReviewSubmissionRepo::refresh_conflict(&mut *conn, submission.id, best_effort)
            .await?
            .ok_or_else(|| lost_review_race(submission.id).into());
    }

    submission
        .status
        .transition(SubmissionStatus::ConflictDetected)?;

    let updated = ReviewSubmissionRepo::mark_conflict(
        &mut *conn,
        submission.id,
        submission.status,
        best_effort,
    )
    .await?
    .ok_or_else(|| lost_review_race(submission.id))?;

    VersionConflictRepo::insert(
        conn,
        submission.id,
        ours.id,
        &format!(
            "Both version {} and the proposed edit changed version {}",
            ours.version_number, base.version_number
        ),
    )
    .await?;

    Ok(updated)
}

async fn load_version(
    executor: impl sqlx::PgExecutor<'_>,
    id: DbId,
) -> WorkflowResult<ArticleVersion> {
    ArticleVersionRepo::find_by_id(executor, id)
        .await?
        .ok_or_else(|| not_found("version", id))
}

fn lost_review_race(submission_id: DbId) -> CoreError {
    CoreError::Conflict(format!(
        "Submission {submission_id} was reviewed concurrently; reload and retry"
    ))
}
