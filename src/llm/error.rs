//! LLM client errors

use thiserror::Error;

/// Errors that can occur during LLM communication
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// API request failed with the given message
    #[error("API error: {message}")]
    ApiError { message: String },

    /// Request timed out after the specified duration (in seconds)
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The model returned no usable text content
    #[error("Empty response from model")]
    EmptyResponse,
}
