//! Claude (Anthropic Messages API) provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{build_client, send_json, ChatProvider, Provider};
use crate::config::ClaudeConfig;
use crate::error::LlmError;

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

/// Anthropic returns content as an array of typed blocks.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    text: Option<String>,
}

#[derive(Clone)]
pub struct ClaudeClient {
    http: reqwest::Client,
    config: ClaudeConfig,
}

impl ClaudeClient {
    pub fn new(config: ClaudeConfig) -> anyhow::Result<Self> {
        let http = build_client(config.timeout)?;
        Ok(Self { http, config })
    }

    fn build_request<'a>(
        &'a self,
        system_prompt: &'a str,
        user_prompt: &'a str,
    ) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            system: system_prompt,
            messages: vec![Message {
                role: "user",
                content: user_prompt,
            }],
        }
    }
}

#[async_trait]
impl ChatProvider for ClaudeClient {
    fn provider(&self) -> Provider {
        Provider::Claude
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::error!("Claude API key is not configured");
            return Err(LlmError::NotConfigured {
                provider: Provider::Claude,
            });
        };

        let request = self
            .http
            .post(&self.config.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.config.api_version)
            .header("Content-Type", "application/json")
            .json(&self.build_request(system_prompt, user_prompt));

        let data: MessagesResponse = send_json(Provider::Claude, request).await?;

        let block = data.content.into_iter().next();
        let text = match block {
            Some(ContentBlock {
                kind,
                text: Some(text),
            }) if kind.as_deref().map_or(true, |k| k == "text") => text,
            other => {
                tracing::error!(
                    block = ?other,
                    "Unexpected Claude response: first content block has no text"
                );
                return Err(LlmError::Protocol {
                    provider: Provider::Claude,
                });
            }
        };

        tracing::debug!(response_len = text.len(), "Claude response received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_url: String, api_key: Option<&str>) -> ClaudeConfig {
        ClaudeConfig {
            api_key: api_key.map(str::to_string),
            api_url,
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            api_version: crate::config::ANTHROPIC_VERSION.to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    fn messages_body(text: &str) -> serde_json::Value {
        json!({
            "id": "msg_test",
            "type": "message",
            "role": "assistant",
            "content": [ { "type": "text", "text": text } ],
            "stop_reason": "end_turn"
        })
    }

    #[tokio::test]
    async fn test_complete_sends_system_and_user_turn() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_json(json!({
                "model": "claude-sonnet-4-20250514",
                "max_tokens": 1024,
                "system": "sys",
                "messages": [ { "role": "user", "content": "hello" } ]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(messages_body("Which fields do you need?")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api_url = format!("{}/v1/messages", server.uri());
        let client = ClaudeClient::new(config(api_url, Some("test-key"))).unwrap();

        let text = client.complete("sys", "hello").await.unwrap();
        assert_eq!(text, "Which fields do you need?");
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(messages_body("unused")))
            .expect(0)
            .mount(&server)
            .await;

        let client = ClaudeClient::new(config(server.uri(), None)).unwrap();
        let err = client.complete("sys", "hello").await.unwrap_err();

        assert!(matches!(
            err,
            LlmError::NotConfigured {
                provider: Provider::Claude
            }
        ));
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_json(json!({
                "type": "error",
                "error": { "type": "overloaded_error", "message": "Overloaded" }
            })))
            .mount(&server)
            .await;

        let client = ClaudeClient::new(config(server.uri(), Some("test-key"))).unwrap();
        let err = client.complete("sys", "hello").await.unwrap_err();

        assert!(matches!(err, LlmError::UpstreamStatus { status: 529, .. }));
        assert_eq!(err.to_string(), "Claude API ошибка: 529");
    }

    #[tokio::test]
    async fn test_empty_content_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": [] })))
            .mount(&server)
            .await;

        let client = ClaudeClient::new(config(server.uri(), Some("test-key"))).unwrap();
        let err = client.complete("sys", "hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_non_text_block_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [ { "type": "tool_use", "id": "toolu_1", "name": "x", "input": {} } ]
            })))
            .mount(&server)
            .await;

        let client = ClaudeClient::new(config(server.uri(), Some("test-key"))).unwrap();
        let err = client.complete("sys", "hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_missing_content_field_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_test" })))
            .mount(&server)
            .await;

        let client = ClaudeClient::new(config(server.uri(), Some("test-key"))).unwrap();
        let err = client.complete("sys", "hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Protocol { .. }));
    }
}
