//! Article label normalization.

use crate::error::CoreError;

pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LEN: usize = 50;

/// Trim, lowercase and de-duplicate tags, preserving first-seen order.
///
/// Fails if any tag is blank or too long, or if more than [`MAX_TAGS`]
/// distinct tags remain.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for raw in tags {
        let tag = raw.trim().to_lowercase();
        if tag.is_empty() {
            return Err(CoreError::Validation("Tags must not be empty".into()));
        }
        if tag.chars().count() > MAX_TAG_LEN {
            return Err(CoreError::Validation(format!(
                "Each tag must be at most {MAX_TAG_LEN} characters"
            )));
        }
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    if out.len() > MAX_TAGS {
        return Err(CoreError::Validation(format!(
            "A maximum of {MAX_TAGS} tags is allowed"
        )));
    }
    Ok(out)
}
