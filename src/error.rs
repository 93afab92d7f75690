//! Error types for the SafeGuard analyzer.
//!
//! Validation failures are a closed taxonomy of their own; everything else
//! funnels into [`SafeguardError`].

use thiserror::Error;

/// Why a candidate message was refused before submission.
///
/// Always recoverable: the user edits the input and submits again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Nothing left after trimming.
    #[error("Please enter a message to analyze")]
    EmptyMessage,

    /// Fewer than the minimum number of characters after trimming.
    #[error("Message must be at least 5 characters long")]
    TooShort,

    /// More than the maximum number of characters after trimming.
    #[error("Message is too long (maximum 5000 characters)")]
    TooLong,
}

impl ValidationError {
    /// Text shown in the inline error notice.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "Please enter a message to analyze",
            Self::TooShort => "Message must be at least 5 characters long",
            Self::TooLong => "Message is too long (maximum 5000 characters)",
        }
    }

    /// Short machine-readable code for API responses and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "empty_message",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
        }
    }
}

/// Central error type for all SafeGuard operations.
#[derive(Debug, Error)]
pub enum SafeguardError {
    /// Submitted message failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Classifier service returned an error or an unexpected response.
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Rate limited by the classifier service.
    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited {
        /// Milliseconds to wait before retry.
        retry_after_ms: u64,
    },

    /// Configuration error (missing env vars, invalid values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Regex pattern compilation error.
    #[error("Regex pattern error: {0}")]
    RegexPattern(#[from] regex::Error),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl SafeguardError {
    /// Log the error at a severity matching its kind.
    pub fn log_with_context(&self, context: &ErrorContext) {
        match self {
            Self::Validation(_) => {
                tracing::debug!(
                    error = %self,
                    request_id = %context.request_id,
                    operation = %context.operation,
                    "Message rejected"
                );
            }
            Self::RateLimited { retry_after_ms } => {
                tracing::warn!(
                    error = %self,
                    request_id = %context.request_id,
                    operation = %context.operation,
                    retry_after_ms = retry_after_ms,
                    "Rate limited"
                );
            }
            Self::Classifier(_) | Self::Http(_) | Self::Json(_) => {
                tracing::error!(
                    error = %self,
                    request_id = %context.request_id,
                    operation = %context.operation,
                    "Classifier service error"
                );
            }
            Self::Config(_) | Self::RegexPattern(_) => {
                tracing::error!(
                    error = %self,
                    request_id = %context.request_id,
                    operation = %context.operation,
                    "Configuration error"
                );
            }
            Self::Io(_) => {
                tracing::error!(
                    error = %self,
                    request_id = %context.request_id,
                    operation = %context.operation,
                    "Internal error"
                );
            }
        }
    }

    /// Get user-friendly error message (hides internal details).
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.user_message(),
            Self::Classifier(_) | Self::Http(_) => "Analysis service temporarily unavailable",
            Self::RateLimited { .. } => "Too many requests, please try again later",
            Self::Config(_) | Self::RegexPattern(_) => "Service configuration error",
            Self::Json(_) => "Data format error",
            Self::Io(_) => "File system error",
        }
    }
}

/// Context information for error logging.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Unique request identifier for correlation
    pub request_id: String,
    /// Operation being performed
    pub operation: String,
}

impl ErrorContext {
    /// Create a new error context with a fresh request ID.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            operation: operation.into(),
        }
    }
}

/// Result type alias for SafeGuard operations.
pub type Result<T> = std::result::Result<T, SafeguardError>;
