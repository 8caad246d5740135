//! HTTP adapters for the text and media ports, plus provider vocabularies.

mod http;
mod media_http;
mod openai_text;
pub mod vocabulary;

pub use media_http::HttpMediaProvider;
pub use openai_text::OpenAiTextGenerator;
pub use vocabulary::{RegexRule, build_classifier};
