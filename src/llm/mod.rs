//! LLM client abstraction layer
//!
//! This module provides a trait-based abstraction for LLM communication,
//! allowing different backends (GenAI, Mock) to be used interchangeably.

mod client;
mod error;
mod genai;
mod mock;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use genai::GenAiClient;
pub use mock::{MockLlmClient, MockResponse};
pub use types::{ChatMessage, LlmRequest, LlmResponse, MessageRole};
