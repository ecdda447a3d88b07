//! Error types for the cache
//!
//! Cache operations themselves are total; these errors only surface while
//! building a cache or parsing its configuration.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The eviction policy name is not recognised
    #[error("Invalid eviction policy: {0}")]
    InvalidPolicy(String),

    /// No tokio runtime is available to host the sweeper task
    #[error("No tokio runtime available to spawn the sweeper task")]
    NoRuntime,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CacheError::InvalidPolicy("fifo".to_string());
        assert_eq!(err.to_string(), "Invalid eviction policy: fifo");

        let err = CacheError::NoRuntime;
        assert!(err.to_string().contains("tokio runtime"));
    }
}
