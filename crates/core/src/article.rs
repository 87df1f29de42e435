//! Article input validation, listing limits and a display-only line diff.
//!
//! The line diff is used to render version comparisons. It is never used by
//! the merge engine, which works on whole snapshots.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_CONTENT_LEN: usize = 200_000;
pub const MAX_COMMIT_MESSAGE_LEN: usize = 500;

/// Commit message used when the caller leaves it blank.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update";
/// Commit message of every article's first version.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial version";

pub const DEFAULT_LIST_LIMIT: i64 = 20;
pub const MAX_LIST_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an article title (non-blank, at most 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate article content. Empty content is allowed.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(CoreError::Validation(format!(
            "Content must be at most {MAX_CONTENT_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate and normalize a commit message. Blank messages become
/// [`DEFAULT_COMMIT_MESSAGE`].
pub fn normalize_commit_message(message: Option<&str>) -> Result<String, CoreError> {
    let trimmed = message.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Ok(DEFAULT_COMMIT_MESSAGE.to_string());
    }
    if trimmed.chars().count() > MAX_COMMIT_MESSAGE_LEN {
        return Err(CoreError::Validation(format!(
            "Commit message must be at most {MAX_COMMIT_MESSAGE_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Clamp a user-provided page size to `1..=MAX_LIST_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Line diff
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffLineType {
    Added,
    Removed,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DiffLine {
    pub line_type: DiffLineType,
    pub content: String,
}

/// Upper bound on LCS table cells (about 16 MB) for one diff.
pub const MAX_DIFF_CELLS: usize = 4_000_000;

/// Line-level diff between two texts.
///
/// Common leading and trailing lines are emitted as unchanged; only the
/// differing middle goes through an LCS table. Fails with `Validation` when
/// that table would exceed [`MAX_DIFF_CELLS`].
pub fn compute_line_diff(old: &str, new: &str) -> Result<Vec<DiffLine>, CoreError> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let prefix = old_lines
        .iter()
        .zip(&new_lines)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_lines[prefix..]
        .iter()
        .rev()
        .zip(new_lines[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old_lines[prefix..old_lines.len() - suffix];
    let new_mid = &new_lines[prefix..new_lines.len() - suffix];

    if (old_mid.len() + 1).saturating_mul(new_mid.len() + 1) > MAX_DIFF_CELLS {
        return Err(CoreError::Validation(format!(
            "Versions differ in too many lines to diff ({} vs {})",
            old_mid.len(),
            new_mid.len()
        )));
    }

    let unchanged = |line: &&str| DiffLine {
        line_type: DiffLineType::Unchanged,
        content: line.to_string(),
    };

    let mut result = Vec::with_capacity(old_lines.len().max(new_lines.len()));
    result.extend(old_lines[..prefix].iter().map(unchanged));
    result.extend(lcs_diff(old_mid, new_mid));
    result.extend(old_lines[old_lines.len() - suffix..].iter().map(unchanged));
    Ok(result)
}

fn lcs_diff(old_lines: &[&str], new_lines: &[&str]) -> Vec<DiffLine> {
    let m = old_lines.len();
    let n = new_lines.len();

    let mut lcs = vec![vec![0u32; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            lcs[i][j] = if old_lines[i - 1] == new_lines[j - 1] {
                lcs[i - 1][j - 1] + 1
            } else {
                lcs[i - 1][j].max(lcs[i][j - 1])
            };
        }
    }

    let mut result = Vec::with_capacity(m.max(n));
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        let (line_type, content) = if i > 0 && j > 0 && old_lines[i - 1] == new_lines[j - 1] {
            i -= 1;
            j -= 1;
            (DiffLineType::Unchanged, old_lines[i])
        } else if j > 0 && (i == 0 || lcs[i][j - 1] >= lcs[i - 1][j]) {
            j -= 1;
            (DiffLineType::Added, new_lines[j])
        } else {
            i -= 1;
            (DiffLineType::Removed, old_lines[i])
        };
        result.push(DiffLine {
            line_type,
            content: content.to_string(),
        });
    }

    result.reverse();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- validation ----------------------------------------------------------

    #[test]
    fn title_rules() {
        assert!(validate_title("Getting started").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"a".repeat(MAX_TITLE_LEN)).is_ok());
        assert!(validate_title(&"a".repeat(MAX_TITLE_LEN + 1)).is_err());
    }

    #[test]
    fn content_rules() {
        assert!(validate_content("").is_ok());
        assert!(validate_content(&"x".repeat(MAX_CONTENT_LEN + 1)).is_err());
    }

    #[test]
    fn blank_commit_message_defaults() {
        assert_eq!(normalize_commit_message(None).unwrap(), DEFAULT_COMMIT_MESSAGE);
        assert_eq!(normalize_commit_message(Some("  ")).unwrap(), DEFAULT_COMMIT_MESSAGE);
        assert_eq!(normalize_commit_message(Some(" fix typo ")).unwrap(), "fix typo");
        let long = "m".repeat(MAX_COMMIT_MESSAGE_LEN + 1);
        assert!(normalize_commit_message(Some(&long)).is_err());
    }

    #[test]
    fn limits_are_clamped() {
        assert_eq!(clamp_limit(None), DEFAULT_LIST_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(1_000)), MAX_LIST_LIMIT);
        assert_eq!(clamp_offset(Some(-3)), 0);
    }

    // -- compute_line_diff ---------------------------------------------------

    #[test]
    fn diff_identical_texts() {
        let diff = compute_line_diff("line1\nline2", "line1\nline2").unwrap();
        assert_eq!(diff.len(), 2);
        assert!(diff.iter().all(|d| d.line_type == DiffLineType::Unchanged));
    }

    #[test]
    fn diff_added_and_removed_lines() {
        let diff = compute_line_diff("keep\nold", "keep\nnew").unwrap();
        let types: Vec<_> = diff.iter().map(|d| d.line_type).collect();
        assert_eq!(types[0], DiffLineType::Unchanged);
        assert!(types.contains(&DiffLineType::Removed));
        assert!(types.contains(&DiffLineType::Added));
    }

    #[test]
    fn diff_from_empty() {
        let diff = compute_line_diff("", "a\nb").unwrap();
        assert_eq!(diff.len(), 2);
        assert!(diff.iter().all(|d| d.line_type == DiffLineType::Added));
    }

    #[test]
    fn diff_keeps_common_prefix_and_suffix() {
        let diff = compute_line_diff("a\nb\nc\nd", "a\nx\nd").unwrap();
        let rendered: Vec<_> = diff
            .iter()
            .map(|d| (d.line_type, d.content.as_str()))
            .collect();
        assert_eq!(rendered.first(), Some(&(DiffLineType::Unchanged, "a")));
        assert_eq!(rendered.last(), Some(&(DiffLineType::Unchanged, "d")));
        assert!(rendered.contains(&(DiffLineType::Removed, "b")));
        assert!(rendered.contains(&(DiffLineType::Removed, "c")));
        assert!(rendered.contains(&(DiffLineType::Added, "x")));
        assert_eq!(rendered.len(), 5);
    }

    #[test]
    fn diff_of_maximal_content_is_refused() {
        // 100k one-character lines per side, each exactly at the content limit.
        let old = "a\n".repeat(MAX_CONTENT_LEN / 2);
        let new = "b\n".repeat(MAX_CONTENT_LEN / 2);
        assert!(validate_content(&old).is_ok());
        assert!(validate_content(&new).is_ok());

        assert!(matches!(
            compute_line_diff(&old, &new),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn diff_of_maximal_content_with_small_edit_succeeds() {
        let old = "a\n".repeat(MAX_CONTENT_LEN / 2);
        let new = format!("{}b\n", "a\n".repeat(MAX_CONTENT_LEN / 2 - 1));

        let diff = compute_line_diff(&old, &new).unwrap();
        assert_eq!(diff.len(), MAX_CONTENT_LEN / 2 + 1);
        let changed = diff
            .iter()
            .filter(|d| d.line_type != DiffLineType::Unchanged)
            .count();
        assert_eq!(changed, 2);
    }
}
