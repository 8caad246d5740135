//! Logging infrastructure: structured session transcripts.
//!
//! Provides [`JsonlSessionLogger`], a JSONL file writer that implements
//! the [`SessionLogger`](draftloop_application::SessionLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlSessionLogger;
