//! Submission intake and review decisions.
//!
//! These functions decide *what* should happen to a proposed edit. The
//! persistence layer applies the decision as one transaction.

use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::merge::{conflict_markers, merge};
use crate::permissions::{ArticleRole, Capability};
use crate::status::SubmissionStatus;
use crate::types::DbId;

/// Review note recorded when a submitter withdraws their own submission.
pub const WITHDRAWN_NOTE: &str = "Withdrawn by submitter";

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

/// What to do with a freshly submitted edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeDecision {
    /// Allocate the version as `published` and swap the head.
    Publish,
    /// Allocate a `pending` version and open a review submission.
    Queue,
}

/// Articles without review publish every edit. Otherwise only roles that
/// may submit directly skip the queue.
pub fn plan_intake(review_required: bool, role: ArticleRole) -> IntakeDecision {
    if !review_required || role.has(Capability::SubmitDirectly) {
        IntakeDecision::Publish
    } else {
        IntakeDecision::Queue
    }
}

// ---------------------------------------------------------------------------
// Review authorization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl FromStr for ReviewAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(CoreError::Validation(format!(
                "Invalid review action '{other}'. Must be one of: approve, reject"
            ))),
        }
    }
}

/// Who is acting on which submission.
#[derive(Debug, Clone, Copy)]
pub struct ReviewContext {
    pub status: SubmissionStatus,
    pub submitted_by: DbId,
    pub reviewer_id: DbId,
    pub reviewer_role: ArticleRole,
    pub review_required: bool,
}

impl ReviewContext {
    fn is_own_submission(&self) -> bool {
        self.submitted_by == self.reviewer_id
    }

    /// Self-approval of an edit on an article that no longer requires review.
    pub fn is_auto_approval(&self) -> bool {
        !self.review_required && self.is_own_submission()
    }
}

/// Check that `action` may be taken on the submission by this reviewer.
///
/// Terminal submissions are rejected with `Conflict` before any permission
/// check so that repeated calls never re-apply. Approval requires the
/// `Review` capability unless it is an auto-approval; rejection is also open
/// to the submitter (withdrawal).
pub fn authorize_review(ctx: &ReviewContext, action: ReviewAction) -> Result<(), CoreError> {
    if !ctx.status.is_actionable() {
        return Err(CoreError::Conflict(format!(
            "Submission has already been {}",
            ctx.status
        )));
    }

    let allowed = ctx.reviewer_role.has(Capability::Review)
        || match action {
            ReviewAction::Approve => ctx.is_auto_approval(),
            ReviewAction::Reject => ctx.is_own_submission(),
        };

    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Role '{}' may not review submissions on this article",
            ctx.reviewer_role
        )))
    }
}

// ---------------------------------------------------------------------------
// Approval planning
// ---------------------------------------------------------------------------

/// The three contents fed to the merge engine. `ours` must be read from the
/// head at review time.
#[derive(Debug, Clone, Copy)]
pub struct Snapshots<'a> {
    pub base: &'a str,
    pub theirs: &'a str,
    pub ours: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalPlan {
    /// Publish the proposed version with `content` and swap the head.
    Merge { content: String, manual: bool },
    /// Record the conflict and hand it back to a human.
    Conflict { best_effort: String },
}

/// Decide how an approval lands. A caller-supplied resolution always wins;
/// otherwise the merge engine decides.
pub fn plan_approval(snapshots: Snapshots<'_>, resolution: Option<&str>) -> ApprovalPlan {
    if let Some(content) = resolution {
        return ApprovalPlan::Merge {
            content: content.to_string(),
            manual: true,
        };
    }

    let outcome = merge(snapshots.base, snapshots.theirs, snapshots.ours);
    match outcome.merged_content {
        Some(content) if !outcome.has_conflict => ApprovalPlan::Merge {
            content,
            manual: false,
        },
        _ => ApprovalPlan::Conflict {
            best_effort: conflict_markers(snapshots.theirs, snapshots.ours),
        },
    }
}

// ---------------------------------------------------------------------------
// Conflict payload
// ---------------------------------------------------------------------------

/// Returned instead of a normal success when an approval conflicts.
/// Re-submitting the review with `merged_content` set resumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictPayload {
    pub submission_id: DbId,
    pub base_content: String,
    pub their_content: String,
    pub our_content: String,
    pub has_conflict: bool,
    pub base_version_number: i32,
    pub current_version_number: i32,
    pub submitter_name: String,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn ctx(status: SubmissionStatus, role: ArticleRole) -> ReviewContext {
        ReviewContext {
            status,
            submitted_by: 10,
            reviewer_id: 20,
            reviewer_role: role,
            review_required: true,
        }
    }

    // -- intake --------------------------------------------------------------

    #[test]
    fn no_review_articles_publish_for_everyone() {
        for role in [
            ArticleRole::Ordinary,
            ArticleRole::Moderator,
            ArticleRole::Admin,
            ArticleRole::Author,
        ] {
            assert_eq!(plan_intake(false, role), IntakeDecision::Publish);
        }
    }

    #[test]
    fn review_required_queues_ordinary_only() {
        assert_eq!(plan_intake(true, ArticleRole::Ordinary), IntakeDecision::Queue);
        assert_eq!(plan_intake(true, ArticleRole::Moderator), IntakeDecision::Publish);
        assert_eq!(plan_intake(true, ArticleRole::Admin), IntakeDecision::Publish);
        assert_eq!(plan_intake(true, ArticleRole::Author), IntakeDecision::Publish);
    }

    // -- authorization -------------------------------------------------------

    #[test]
    fn action_parsing() {
        assert_eq!("approve".parse::<ReviewAction>().unwrap(), ReviewAction::Approve);
        assert_eq!("reject".parse::<ReviewAction>().unwrap(), ReviewAction::Reject);
        assert_matches!("merge".parse::<ReviewAction>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn moderator_may_review() {
        let c = ctx(SubmissionStatus::Pending, ArticleRole::Moderator);
        assert!(authorize_review(&c, ReviewAction::Approve).is_ok());
        assert!(authorize_review(&c, ReviewAction::Reject).is_ok());
    }

    #[test]
    fn ordinary_reviewer_is_forbidden() {
        let c = ctx(SubmissionStatus::Pending, ArticleRole::Ordinary);
        assert_matches!(
            authorize_review(&c, ReviewAction::Approve),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            authorize_review(&c, ReviewAction::Reject),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn terminal_submissions_are_not_reapplied() {
        for status in [SubmissionStatus::Merged, SubmissionStatus::Rejected] {
            let c = ctx(status, ArticleRole::Author);
            assert_matches!(
                authorize_review(&c, ReviewAction::Approve),
                Err(CoreError::Conflict(_))
            );
        }
    }

    #[test]
    fn conflict_detected_remains_reviewable() {
        let c = ctx(SubmissionStatus::ConflictDetected, ArticleRole::Admin);
        assert!(authorize_review(&c, ReviewAction::Approve).is_ok());
    }

    #[test]
    fn auto_approval_only_on_no_review_articles() {
        let mut c = ctx(SubmissionStatus::Pending, ArticleRole::Ordinary);
        c.reviewer_id = c.submitted_by;
        assert!(authorize_review(&c, ReviewAction::Approve).is_err());

        c.review_required = false;
        assert!(c.is_auto_approval());
        assert!(authorize_review(&c, ReviewAction::Approve).is_ok());
    }

    #[test]
    fn submitter_may_withdraw_own_submission() {
        let mut c = ctx(SubmissionStatus::Pending, ArticleRole::Ordinary);
        c.reviewer_id = c.submitted_by;
        assert!(authorize_review(&c, ReviewAction::Reject).is_ok());
    }

    // -- approval ------------------------------------------------------------

    #[test]
    fn clean_merge_when_head_unchanged() {
        let plan = plan_approval(
            Snapshots {
                base: "v1",
                theirs: "v1+A",
                ours: "v1",
            },
            None,
        );
        assert_eq!(
            plan,
            ApprovalPlan::Merge {
                content: "v1+A".into(),
                manual: false
            }
        );
    }

    #[test]
    fn sibling_review_conflicts_after_head_moves() {
        let plan = plan_approval(
            Snapshots {
                base: "v1",
                theirs: "v1+B",
                ours: "v1+A",
            },
            None,
        );
        assert_matches!(plan, ApprovalPlan::Conflict { best_effort } => {
            assert!(best_effort.contains("v1+A"));
            assert!(best_effort.contains("v1+B"));
        });
    }

    #[test]
    fn manual_resolution_overrides_merge() {
        let plan = plan_approval(
            Snapshots {
                base: "v1",
                theirs: "v1+B",
                ours: "v1+A",
            },
            Some("v1+A+B"),
        );
        assert_eq!(
            plan,
            ApprovalPlan::Merge {
                content: "v1+A+B".into(),
                manual: true
            }
        );
    }
}
