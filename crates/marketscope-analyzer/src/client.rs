//! Clients for the external inference service.

use std::time::Duration;

use async_trait::async_trait;
use marketscope_core::InferenceSettings;
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// Upper bound on how much of an error body is kept in [`InferenceError::UnexpectedStatus`].
const ERROR_BODY_PREVIEW_CHARS: usize = 300;

/// A prompt-in, text-out inference capability.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Send `prompt` under a role-setting `system_role` message and return the raw reply.
    async fn complete(&self, system_role: &str, prompt: &str) -> Result<String, InferenceError>;
}

/// OpenAI-compatible chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`InferenceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(settings: &InferenceSettings) -> Result<Self, InferenceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!(
                "{}/chat/completions",
                settings.base_url.trim_end_matches('/')
            ),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }
}

#[async_trait]
impl InferenceClient for OpenAiClient {
    async fn complete(&self, system_role: &str, prompt: &str) -> Result<String, InferenceError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_role,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect(),
            });
        }

        let raw = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&raw).map_err(|source| InferenceError::Malformed {
                context: "chat completion envelope".to_string(),
                source,
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(InferenceError::EmptyResponse)?;

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            reply_chars = content.chars().count(),
            "inference call completed"
        );
        Ok(content)
    }
}
