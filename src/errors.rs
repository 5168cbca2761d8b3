//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the tariff reference search server, providing
//! structured error types and conversion utilities for all system components.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from dataset loading, matching, and the API layer
//! - **Output**: Structured error types with context, mapped to HTTP statuses at the boundary
//! - **Error Categories**: Configuration, Datasets, Search, API
//!
//! ## Key Features
//! - Struct-variant error types with detailed context
//! - Automatic error conversion and chaining
//! - User-friendly error messages for API responses
//! - Structured logging integration via `category()`

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, SearchError>;

/// Error types for the tariff reference search server
#[derive(Debug, Error)]
pub enum SearchError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A dataset table file could not be loaded or parsed.
    /// Endpoints for the dataset serve this error instead of empty results.
    #[error("Dataset '{dataset}' is unavailable: {details}")]
    DatasetUnavailable { dataset: String, details: String },

    /// An endpoint named a dataset the registry does not know
    #[error("Unknown dataset: {dataset}")]
    DatasetNotFound { dataset: String },

    /// A context lookup asked for a stable index absent from the corpus
    #[error("Paragraph index {index} not found in the explanatory notes corpus")]
    ContextIndexNotFound { index: i64 },

    /// Validation errors
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SearchError {
    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            SearchError::Config { .. } | SearchError::Toml(_) => "configuration",
            SearchError::DatasetUnavailable { .. } | SearchError::DatasetNotFound { .. } => {
                "datasets"
            }
            SearchError::ContextIndexNotFound { .. } => "search",
            SearchError::ValidationFailed { .. } => "validation",
            SearchError::Json(_) | SearchError::Io(_) | SearchError::Internal { .. } => "system",
        }
    }

    /// Whether the error maps to a client-visible "not found" condition
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SearchError::DatasetNotFound { .. } | SearchError::ContextIndexNotFound { .. }
        )
    }
}

// Helper macro for common error patterns
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::errors::SearchError::Internal {
            message: $msg.to_string(),
        }
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::errors::SearchError::Internal {
            message: format!($fmt, $($arg)*),
        }
    };
}
