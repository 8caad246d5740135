//! Prompt domain
//!
//! Templates for the author, critic and illustration prompts.

mod template;

pub use template::PromptTemplate;
