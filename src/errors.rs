//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the policy navigator, providing structured error
//! types and conversion utilities for all system components.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from various system components
//! - **Output**: Structured error types with context and error chains
//! - **Error Categories**: Configuration, Network, Sections, Ingestion, Routing, Notification
//!
//! ## Key Features
//! - Hierarchical error types with detailed context
//! - Automatic error conversion and chaining
//! - User-friendly error messages rendered into the response channel
//! - Structured logging integration
//!
//! ## Usage
//! ```rust,ignore
//! use crate::errors::{Result, NavigatorError};
//!
//! fn load_dataset() -> Result<Vec<String>> {
//!     Err(NavigatorError::DataParsing {
//!         source_name: "commercial_code.json".to_string(),
//!         details: "unexpected end of input".to_string(),
//!     })
//! }
//! ```

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, NavigatorError>;

/// Error types for the policy navigator
#[derive(Debug, Error)]
pub enum NavigatorError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// Network-related errors
    #[error("Network error: {details}")]
    Network { details: String },

    /// Data parsing errors
    #[error("Failed to parse data from {source_name}: {details}")]
    DataParsing { source_name: String, details: String },

    // Section store errors
    #[error("Failed to load section dataset {path}: {details}")]
    DatasetLoad { path: String, details: String },

    // Document ingestion errors
    #[error("Unsupported file type: {extension}")]
    UnsupportedFileType { extension: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("No extractable text found in PDF: {path}")]
    EmptyDocument { path: String },

    #[error("Failed to extract text from {path}: {details}")]
    ExtractionFailed { path: String, details: String },

    /// Notification sink errors, logged but never propagated to callers
    #[error("Notification failed: {details}")]
    Notification { details: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl NavigatorError {
    /// Check if the error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            NavigatorError::Network { .. } | NavigatorError::Notification { .. } => true,
            NavigatorError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            NavigatorError::Config { .. } | NavigatorError::ValidationFailed { .. } => {
                "configuration"
            }
            NavigatorError::Network { .. } | NavigatorError::Http(_) => "network",
            NavigatorError::DatasetLoad { .. } => "sections",
            NavigatorError::UnsupportedFileType { .. }
            | NavigatorError::FileNotFound { .. }
            | NavigatorError::EmptyDocument { .. }
            | NavigatorError::ExtractionFailed { .. } => "ingestion",
            NavigatorError::Notification { .. } => "notification",
            NavigatorError::DataParsing { .. } | NavigatorError::Json(_) => "parsing",
            NavigatorError::Toml(_) => "configuration",
            NavigatorError::Internal { .. } | NavigatorError::Io(_) => "generic",
        }
    }
}

// Helper macro for common error patterns
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::errors::NavigatorError::Internal {
            message: $msg.to_string(),
        }
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::errors::NavigatorError::Internal {
            message: format!($fmt, $($arg)*),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let err = NavigatorError::UnsupportedFileType {
            extension: ".xyz".to_string(),
        };
        assert_eq!(err.category(), "ingestion");
        assert!(!err.is_recoverable());

        let err = NavigatorError::Network {
            details: "connection refused".to_string(),
        };
        assert_eq!(err.category(), "network");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_display_text() {
        let err = NavigatorError::UnsupportedFileType {
            extension: ".xyz".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported file type: .xyz");
    }
}
