//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs for inserts and patches
//! - `Serialize` response structs for composite views

pub mod article;
pub mod article_version;
pub mod collaborator;
pub mod review_submission;
pub mod user;
pub mod version_conflict;
