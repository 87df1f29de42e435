//! Domain logic for the article revision and review engine.
//!
//! Everything here is pure: no I/O, no database types. The persistence and
//! HTTP crates build on these decisions.

pub mod article;
pub mod error;
pub mod merge;
pub mod permissions;
pub mod review;
pub mod status;
pub mod tags;
pub mod types;
