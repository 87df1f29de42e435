//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Single-statement methods accept any `PgExecutor` so they work against
//! both the pool and an open transaction; methods that must run inside the
//! caller's transaction take `&mut PgConnection`.

pub mod article_repo;
pub mod article_version_repo;
pub mod collaborator_repo;
pub mod review_submission_repo;
pub mod user_repo;
pub mod version_conflict_repo;

pub use article_repo::ArticleRepo;
pub use article_version_repo::ArticleVersionRepo;
pub use collaborator_repo::CollaboratorRepo;
pub use review_submission_repo::ReviewSubmissionRepo;
pub use user_repo::UserRepo;
pub use version_conflict_repo::VersionConflictRepo;
