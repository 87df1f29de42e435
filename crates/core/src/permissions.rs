//! Per-article permission gate.
//!
//! An article-local role is resolved from authorship first, then the
//! collaborator table, and defaults to [`ArticleRole::Ordinary`]. The global
//! identity role is kept out of that resolution: a global
//! administrator with no local grant is an ordinary contributor for submit,
//! review and publish purposes. Only article deletion consults it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Global role name carried in access tokens for administrators.
pub const GLOBAL_ROLE_ADMIN: &str = "admin";
/// Global role name carried in access tokens for everybody else.
pub const GLOBAL_ROLE_USER: &str = "user";

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Effective role of a caller on one article.
///
/// Variants are declared in ascending order of authority so that capability
/// checks reduce to a single `>=` comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleRole {
    Ordinary,
    Moderator,
    Admin,
    Author,
}

impl ArticleRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ordinary => "ordinary",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
            Self::Author => "author",
        }
    }

    /// Whether this role grants `capability`.
    pub fn has(self, capability: Capability) -> bool {
        self >= capability.required_role()
    }

    /// Like [`ArticleRole::has`] but produces a `Forbidden` error.
    pub fn require(self, capability: Capability) -> Result<(), CoreError> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Role '{}' may not {} on this article",
                self.as_str(),
                capability.describe()
            )))
        }
    }
}

impl fmt::Display for ArticleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role stored in the `article_collaborators` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorRole {
    Admin,
    Moderator,
}

impl CollaboratorRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Moderator => "moderator",
        }
    }
}

impl From<CollaboratorRole> for ArticleRole {
    fn from(value: CollaboratorRole) -> Self {
        match value {
            CollaboratorRole::Admin => ArticleRole::Admin,
            CollaboratorRole::Moderator => ArticleRole::Moderator,
        }
    }
}

impl FromStr for CollaboratorRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" | "owner" => Ok(Self::Admin),
            "moderator" => Ok(Self::Moderator),
            other => Err(CoreError::Validation(format!(
                "Invalid collaborator role '{other}'. Valid roles: admin, moderator"
            ))),
        }
    }
}

impl TryFrom<String> for CollaboratorRole {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Role issued by the identity layer, independent of any article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalRole {
    Administrator,
    User,
}

impl GlobalRole {
    /// Map a token role name. Unknown names are treated as plain users.
    pub fn from_claim(role: &str) -> Self {
        if role == GLOBAL_ROLE_ADMIN {
            Self::Administrator
        } else {
            Self::User
        }
    }

    pub fn is_administrator(self) -> bool {
        self == Self::Administrator
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Role-gated operations on an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Propose an edit (always allowed).
    Submit,
    /// Publish an edit without going through review.
    SubmitDirectly,
    /// Approve or reject other users' submissions.
    Review,
    EditMetadata,
    ManageCollaborators,
    Delete,
}

impl Capability {
    fn required_role(self) -> ArticleRole {
        match self {
            Self::Submit => ArticleRole::Ordinary,
            Self::SubmitDirectly | Self::Review => ArticleRole::Moderator,
            Self::EditMetadata | Self::ManageCollaborators | Self::Delete => ArticleRole::Admin,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Submit => "submit edits",
            Self::SubmitDirectly => "publish without review",
            Self::Review => "review submissions",
            Self::EditMetadata => "edit metadata",
            Self::ManageCollaborators => "manage collaborators",
            Self::Delete => "delete the article",
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve a caller's role on an article. First match wins: authorship,
/// then an explicit collaborator grant, then ordinary.
pub fn resolve_article_role(
    article_created_by: DbId,
    user_id: DbId,
    collaborator: Option<CollaboratorRole>,
) -> ArticleRole {
    if user_id == article_created_by {
        return ArticleRole::Author;
    }
    match collaborator {
        Some(role) => role.into(),
        None => ArticleRole::Ordinary,
    }
}

/// Deletion is the single operation where the global administrator flag
/// applies on top of the article-local role.
pub fn can_delete_article(role: ArticleRole, global: GlobalRole) -> bool {
    global.is_administrator() || role.has(Capability::Delete)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTHOR: DbId = 1;
    const OTHER: DbId = 2;

    #[test]
    fn author_wins_over_collaborator_grant() {
        let role = resolve_article_role(AUTHOR, AUTHOR, Some(CollaboratorRole::Moderator));
        assert_eq!(role, ArticleRole::Author);
    }

    #[test]
    fn collaborator_grant_is_used() {
        assert_eq!(
            resolve_article_role(AUTHOR, OTHER, Some(CollaboratorRole::Admin)),
            ArticleRole::Admin
        );
        assert_eq!(
            resolve_article_role(AUTHOR, OTHER, Some(CollaboratorRole::Moderator)),
            ArticleRole::Moderator
        );
    }

    #[test]
    fn absent_grant_is_ordinary() {
        assert_eq!(resolve_article_role(AUTHOR, OTHER, None), ArticleRole::Ordinary);
    }

    #[test]
    fn roles_are_ordered() {
        assert!(ArticleRole::Author > ArticleRole::Admin);
        assert!(ArticleRole::Admin > ArticleRole::Moderator);
        assert!(ArticleRole::Moderator > ArticleRole::Ordinary);
    }

    #[test]
    fn capability_table() {
        use Capability::*;
        let all = [Submit, SubmitDirectly, Review, EditMetadata, ManageCollaborators, Delete];

        for cap in all {
            assert!(ArticleRole::Author.has(cap));
            assert!(ArticleRole::Admin.has(cap));
        }

        assert!(ArticleRole::Moderator.has(Submit));
        assert!(ArticleRole::Moderator.has(SubmitDirectly));
        assert!(ArticleRole::Moderator.has(Review));
        assert!(!ArticleRole::Moderator.has(EditMetadata));
        assert!(!ArticleRole::Moderator.has(ManageCollaborators));
        assert!(!ArticleRole::Moderator.has(Delete));

        assert!(ArticleRole::Ordinary.has(Submit));
        for cap in [SubmitDirectly, Review, EditMetadata, ManageCollaborators, Delete] {
            assert!(!ArticleRole::Ordinary.has(cap));
        }
    }

    #[test]
    fn global_admin_is_not_article_admin() {
        // Resolution never consults the global role.
        let role = resolve_article_role(AUTHOR, OTHER, None);
        assert_eq!(role, ArticleRole::Ordinary);
        assert!(!role.has(Capability::Review));
        assert!(!role.has(Capability::SubmitDirectly));
        assert!(role.require(Capability::Review).is_err());

        // Deletion is the one place the global flag applies.
        assert!(can_delete_article(role, GlobalRole::Administrator));
        assert!(!can_delete_article(role, GlobalRole::User));
    }

    #[test]
    fn global_role_from_claim() {
        assert_eq!(GlobalRole::from_claim("admin"), GlobalRole::Administrator);
        assert_eq!(GlobalRole::from_claim("user"), GlobalRole::User);
        assert_eq!(GlobalRole::from_claim("reviewer"), GlobalRole::User);
    }

    #[test]
    fn collaborator_role_parsing() {
        assert_eq!("admin".parse::<CollaboratorRole>().unwrap(), CollaboratorRole::Admin);
        assert_eq!("owner".parse::<CollaboratorRole>().unwrap(), CollaboratorRole::Admin);
        assert_eq!(
            "moderator".parse::<CollaboratorRole>().unwrap(),
            CollaboratorRole::Moderator
        );
        assert!("author".parse::<CollaboratorRole>().is_err());
    }
}
