//! Content-level three-way merge.
//!
//! Compares whole snapshots by equality only. Any divergent edit on both
//! sides is a conflict, even when the edits touch disjoint regions of the
//! text. Callers that need finer granularity must segment content before
//! calling [`merge`].

use serde::Serialize;

/// Result of reconciling `base`, `theirs` and `ours`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub has_conflict: bool,
    /// `None` exactly when `has_conflict` is set.
    pub merged_content: Option<String>,
}

impl MergeOutcome {
    fn clean(content: &str) -> Self {
        Self {
            has_conflict: false,
            merged_content: Some(content.to_string()),
        }
    }

    fn conflict() -> Self {
        Self {
            has_conflict: true,
            merged_content: None,
        }
    }
}

/// Three-way merge of whole-content snapshots.
///
/// `theirs` is the incoming proposal, `ours` is the current head and `base`
/// is the version the proposal was written against. Total and pure.
pub fn merge(base: &str, theirs: &str, ours: &str) -> MergeOutcome {
    let theirs_changed = theirs != base;
    let ours_changed = ours != base;

    match (theirs_changed, ours_changed) {
        (true, true) if theirs != ours => MergeOutcome::conflict(),
        (false, true) => MergeOutcome::clean(ours),
        // Only theirs changed, nothing changed, or both converged.
        _ => MergeOutcome::clean(theirs),
    }
}

/// Conflict-marked rendering of both sides, stored on a submission as the
/// best-effort merge result so reviewers have a starting point.
pub fn conflict_markers(theirs: &str, ours: &str) -> String {
    let mut out = String::with_capacity(theirs.len() + ours.len() + 64);
    out.push_str("<<<<<<< current\n");
    out.push_str(ours);
    if !ours.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("=======\n");
    out.push_str(theirs);
    if !theirs.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(">>>>>>> proposed\n");
    out
}
