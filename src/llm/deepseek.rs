//! DeepSeek API Provider
//! Speaks the OpenAI Chat Completions format.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{build_client, send_json, ChatProvider, Provider};
use crate::config::DeepSeekConfig;
use crate::error::LlmError;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct DeepSeekClient {
    http: reqwest::Client,
    config: DeepSeekConfig,
}

impl DeepSeekClient {
    pub fn new(config: DeepSeekConfig) -> anyhow::Result<Self> {
        let http = build_client(config.timeout)?;
        Ok(Self { http, config })
    }

    fn build_request<'a>(
        &'a self,
        system_prompt: &'a str,
        user_prompt: &'a str,
    ) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream: false,
        }
    }
}

#[async_trait]
impl ChatProvider for DeepSeekClient {
    fn provider(&self) -> Provider {
        Provider::DeepSeek
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::error!("DeepSeek API key is not configured");
            return Err(LlmError::NotConfigured {
                provider: Provider::DeepSeek,
            });
        };

        let request = self
            .http
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(system_prompt, user_prompt));

        let data: ChatCompletionResponse = send_json(Provider::DeepSeek, request).await?;

        let content = data
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                tracing::error!("Unexpected DeepSeek response: no message content in first choice");
                LlmError::Protocol {
                    provider: Provider::DeepSeek,
                }
            })?;

        tracing::debug!(response_len = content.len(), "DeepSeek response received");
        Ok(content)
    }
}
