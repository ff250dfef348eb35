//! OpenAI-backed generation engine.

use super::{Generation, Generator, Role, Turn};
use crate::error::{LaereError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, FinishReason,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Default timeout for chat completion requests (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Generation engine backed by the OpenAI chat completions API.
pub struct OpenAIGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIGenerator {
    /// Create a generator for the given model, with a request timeout so a
    /// stalled API call cannot hang a tutoring turn indefinitely.
    pub fn new(model: &str) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client: Client::with_config(OpenAIConfig::default()).with_http_client(http_client),
            model: model.to_string(),
            temperature: 0.7,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    async fn generate(&self, instruction: Option<&str>, turns: &[Turn]) -> Result<Generation> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();

        if let Some(instruction) = instruction {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(instruction.to_string())
                    .build()
                    .map_err(|e| LaereError::Generation(e.to_string()))?
                    .into(),
            );
        }

        for turn in turns {
            let message: ChatCompletionRequestMessage = match turn.role {
                Role::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(turn.content.clone())
                    .build()
                    .map_err(|e| LaereError::Generation(e.to_string()))?
                    .into(),
                Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(turn.content.clone())
                    .build()
                    .map_err(|e| LaereError::Generation(e.to_string()))?
                    .into(),
            };
            messages.push(message);
        }

        debug!("Generating with {} ({} turns)", self.model, turns.len());

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| LaereError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LaereError::OpenAI(format!("Chat API error: {}", e)))?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| LaereError::Generation("No response from model".to_string()))?;

        if matches!(choice.finish_reason, Some(FinishReason::ContentFilter)) {
            return Ok(Generation::Blocked(
                "the provider's content filter".to_string(),
            ));
        }

        let text = choice
            .message
            .content
            .clone()
            .ok_or_else(|| LaereError::Generation("Empty response from model".to_string()))?;

        Ok(Generation::Text(text))
    }
}
