//! Draft subdomain
//!
//! - [`entities::Draft`]: the title/body pair being refined
//! - [`parsing`]: turning free-text author output into a [`entities::Draft`]

pub mod entities;
pub mod parsing;

pub use entities::{Draft, MIN_BODY_CHARS};
pub use parsing::{
    AuthorResponseError, BODY_MARKER, END_MARKER, TITLE_MARKER, parse_author_response,
};
