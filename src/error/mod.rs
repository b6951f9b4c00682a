//! Error types for Portico.

use thiserror::Error;

/// Primary error type for all Portico operations.
#[derive(Error, Debug)]
pub enum PorticoError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Coarse classification used when deciding how an error is surfaced.
///
/// Configuration errors are fatal to their bootstrap step, authentication
/// failures become session-state flags, network failures degrade to
/// defaults, and protocol/invariant violations are logged and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Authentication,
    Network,
    Protocol,
    Invariant,
    Io,
    Serialization,
    Unsupported,
    Unknown,
}

impl PorticoError {
    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::Network(_) => ErrorCategory::Network,
            Self::Protocol(_) => ErrorCategory::Protocol,
            Self::Invariant(_) => ErrorCategory::Invariant,
            Self::Io(_) => ErrorCategory::Io,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::UnsupportedOperation(_) => ErrorCategory::Unsupported,
            Self::InvalidState(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether the error should tear down the current session rather than
    /// degrade silently.
    pub fn is_authentication(&self) -> bool {
        self.category() == ErrorCategory::Authentication
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PorticoError>;
