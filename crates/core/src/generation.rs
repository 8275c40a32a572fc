//! The text-generation capability seen by panel tasks.
//!
//! `GenerationClient` is the narrow "prompt in, text out" view of an LLM.
//! [`ProviderClient`] adapts any [`Provider`] to it by pinning a model and
//! sampling settings.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::GenerationError;
use crate::message::Message;
use crate::provider::{Provider, ProviderRequest};

/// Given a prompt, return generated text or fail.
///
/// Implementations must tolerate concurrent independent calls; the panel
/// shares one client across all specialist tasks of a run.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// A [`GenerationClient`] backed by a chat [`Provider`].
pub struct ProviderClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl ProviderClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Cap the number of generated tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerationClient for ProviderClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            provider = self.provider.name(),
            model = %self.model,
            prompt_chars = prompt.len(),
            "Requesting generation"
        );

        let response = self.provider.complete(request).await?;
        let content = response.message.content;
        if content.trim().is_empty() {
            return Err(GenerationError::EmptyResponse(format!(
                "{} returned no content for model {}",
                self.provider.name(),
                response.model
            )));
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::ProviderResponse;
    use std::sync::Mutex;

    struct EchoProvider {
        reply: String,
        seen: Mutex<Vec<ProviderRequest>>,
    }

    #[async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            let model = request.model.clone();
            self.seen.lock().unwrap().push(request);
            Ok(ProviderResponse {
                message: Message::assistant(self.reply.clone()),
                usage: None,
                model,
            })
        }
    }

    fn echo(reply: &str) -> Arc<EchoProvider> {
        Arc::new(EchoProvider {
            reply: reply.into(),
            seen: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn sends_prompt_as_single_user_message() {
        let provider = echo("analysis");
        let client = ProviderClient::new(provider.clone(), "gpt-4o")
            .with_temperature(0.2)
            .with_max_tokens(512);

        let text = client.generate("Review this report").await.unwrap();
        assert_eq!(text, "analysis");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "gpt-4o");
        assert_eq!(seen[0].max_tokens, Some(512));
        assert_eq!(seen[0].messages.len(), 1);
        assert_eq!(seen[0].messages[0].content, "Review this report");
    }

    #[tokio::test]
    async fn blank_content_is_an_empty_response_error() {
        let client = ProviderClient::new(echo("   "), "gpt-4o");
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse(_)));
    }
}
