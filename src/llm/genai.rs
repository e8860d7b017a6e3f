//! GenAI-based LLM client implementation
//!
//! An LLM client built on the `genai` crate. The provider is inferred from
//! the model name by genai; the API key from the loaded configuration is
//! injected through a service target resolver so credentials never have to
//! live in the process environment.

use super::client::LlmClient;
use super::error::LlmError;
use super::types::{ChatMessage, LlmRequest, LlmResponse, MessageRole};
use async_trait::async_trait;
use genai::chat::{ChatMessage as GenAiChatMessage, ChatOptions, ChatRequest as GenAiChatRequest};
use genai::resolver::{AuthData, ServiceTargetResolver};
use genai::{Client, ServiceTarget};
use std::time::Duration;
use tracing::{debug, error};

/// GenAI-based LLM client
pub struct GenAiClient {
    /// GenAI client instance
    client: Client,
    /// Model name
    model: String,
    /// Request timeout
    timeout: Duration,
}

impl GenAiClient {
    /// Creates a new GenAI client
    ///
    /// # Arguments
    ///
    /// * `model` - Model name (provider is inferred from it by genai)
    /// * `api_key` - API key injected into every request; when empty, genai
    ///   falls back to its standard provider environment variables
    /// * `timeout` - Request timeout
    pub fn new(model: String, api_key: String, timeout: Duration) -> Self {
        let client = if api_key.is_empty() {
            Client::default()
        } else {
            let resolver = ServiceTargetResolver::from_resolver_fn(
                move |service_target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
                    Ok(ServiceTarget {
                        auth: AuthData::from_single(api_key.clone()),
                        ..service_target
                    })
                },
            );

            Client::builder()
                .with_service_target_resolver(resolver)
                .build()
        };

        debug!("Creating GenAI client: model={}", model);

        Self {
            client,
            model,
            timeout,
        }
    }

    /// Converts our ChatMessage to genai ChatMessage
    fn convert_message(msg: &ChatMessage) -> GenAiChatMessage {
        match msg.role {
            MessageRole::System => GenAiChatMessage::system(&msg.content),
            MessageRole::User => GenAiChatMessage::user(&msg.content),
            MessageRole::Assistant => GenAiChatMessage::assistant(&msg.content),
        }
    }
}

#[async_trait]
impl LlmClient for GenAiClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = std::time::Instant::now();

        let messages: Vec<GenAiChatMessage> =
            request.messages.iter().map(Self::convert_message).collect();

        let genai_request = GenAiChatRequest::new(messages);

        let mut options = ChatOptions::default();
        if let Some(temp) = request.temperature {
            options = options.with_temperature(temp as f64);
        }
        if let Some(max_tokens) = request.max_tokens {
            options = options.with_max_tokens(max_tokens);
        }

        let response = match tokio::time::timeout(
            self.timeout,
            self.client
                .exec_chat(&self.model, genai_request, Some(&options)),
        )
        .await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                error!("Model API error: {}", e);
                return Err(LlmError::ApiError {
                    message: format!("{} request failed: {}", self.model, e),
                });
            }
            Err(_) => {
                error!(
                    "Model request timed out after {}s",
                    self.timeout.as_secs()
                );
                return Err(LlmError::Timeout {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let content = response
            .first_text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyResponse)?;

        Ok(LlmResponse::text(content, start.elapsed()))
    }

    fn name(&self) -> &str {
        "genai"
    }

    fn model_info(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

impl std::fmt::Debug for GenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiClient")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
