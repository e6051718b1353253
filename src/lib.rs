/// cartwhisper library
///
/// Core functionality for the voice-driven shopping list.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod gemini;
pub mod session;

// Re-exports for convenience
pub use db::Database;
pub use error::{CartError, Result};
