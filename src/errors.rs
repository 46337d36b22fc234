//! # Write Path Errors
//!
//! Errors surfaced to write submitters. Device-side failures never appear
//! here: they are delivered as per-update [`ItemResult`](crate::ItemResult)s.

use std::io;

use thiserror::Error;

/// Result type for write path operations
pub type WriteResult<T> = Result<T, WriteError>;

/// Write path errors
#[derive(Debug, Error)]
pub enum WriteError {
    /// The write queue or dispatcher has been torn down
    #[error("Write queue closed")]
    Closed,

    /// The write queue is at capacity (non-waiting submission only)
    #[error("Write queue full (capacity: {0})")]
    QueueFull(usize),

    /// The dispatcher task died from a panic
    #[error("Write dispatcher panicked")]
    DispatcherPanicked,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to read configuration
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl WriteError {
    /// Whether retrying the same submission later can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, WriteError::QueueFull(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(WriteError::Closed.to_string(), "Write queue closed");
        assert_eq!(
            WriteError::QueueFull(8).to_string(),
            "Write queue full (capacity: 8)"
        );
    }

    #[test]
    fn test_only_queue_full_is_retryable() {
        assert!(WriteError::QueueFull(1).is_retryable());
        assert!(!WriteError::Closed.is_retryable());
        assert!(!WriteError::DispatcherPanicked.is_retryable());
        assert!(!WriteError::Config("bad".into()).is_retryable());
    }
}
