/// Error types for cartwhisper
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for cartwhisper operations
#[derive(Error, Debug)]
pub enum CartError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport errors while talking to Gemini
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Intent payload failed validation
    #[error("Malformed intent: {0}")]
    MalformedIntent(String),

    /// Extraction or recommendation service failed or answered nonsense
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// A store write failed after the in-memory change was already applied
    #[error("Persistence write failed: {0}")]
    PersistenceWriteFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for cartwhisper operations
pub type Result<T> = std::result::Result<T, CartError>;

/// Convert CartError to a user-friendly error message
impl CartError {
    pub fn user_message(&self) -> String {
        match self {
            CartError::Database(e) => {
                format!("Database error. Please try again. Details: {}", e)
            }
            CartError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            CartError::Http(e) => {
                format!("Couldn't reach Gemini. Check your connection. Details: {}", e)
            }
            CartError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            CartError::MalformedIntent(reason) => {
                format!("Couldn't make sense of that command: {}", reason)
            }
            CartError::UpstreamUnavailable(reason) => {
                format!("The assistant is unavailable right now: {}", reason)
            }
            CartError::PersistenceWriteFailed(reason) => {
                format!("Your list is up to date on screen but couldn't be saved: {}", reason)
            }
            CartError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = CartError::MalformedIntent("missing intent field".to_string());
        assert!(err.user_message().contains("missing intent field"));

        let err = CartError::PersistenceWriteFailed("disk full".to_string());
        assert!(err.user_message().contains("couldn't be saved"));
    }

    #[test]
    fn test_error_display() {
        let err = CartError::UpstreamUnavailable("timeout".to_string());
        let display = format!("{}", err);
        assert!(display.contains("Upstream unavailable"));
    }
}
