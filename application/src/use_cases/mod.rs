//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod collaborate;
pub mod compose_article;
pub mod generate_media;
pub(crate) mod shared;
