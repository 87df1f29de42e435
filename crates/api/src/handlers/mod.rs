pub mod articles;
pub mod collaborators;
pub mod reviews;
pub mod versions;
