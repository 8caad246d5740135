//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod media_provider;
pub mod progress;
pub mod session_logger;
pub mod text_generator;
