//! LLM abstraction layer for unified API calls
//! Supports DeepSeek (OpenAI-compatible chat) and Claude (Anthropic Messages)

use std::fmt;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};

use crate::error::LlmError;

pub mod claude;
pub mod deepseek;
pub mod router;

pub use claude::ClaudeClient;
pub use deepseek::DeepSeekClient;
pub use router::LlmRouter;

/// Which upstream service handles a request.
///
/// Parsing is total: `"claude"` selects Claude, every other value falls back
/// to DeepSeek.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Provider {
    #[default]
    DeepSeek,
    Claude,
}

impl Provider {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("claude") {
            Provider::Claude
        } else {
            Provider::DeepSeek
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::DeepSeek => f.write_str("DeepSeek"),
            Provider::Claude => f.write_str("Claude"),
        }
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        if !value.eq_ignore_ascii_case("claude") && !value.eq_ignore_ascii_case("deepseek") {
            tracing::debug!(provider = %value, "Unknown provider, using DeepSeek");
        }
        Ok(Provider::parse(&value))
    }
}

/// A generated-text backend. Each implementation owns its wire format and
/// the path the answer is extracted from.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn provider(&self) -> Provider;

    fn is_configured(&self) -> bool;

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;
}

/// Send a prepared request exactly once and decode the JSON answer.
///
/// Transport failures, non-success statuses and undecodable bodies are all
/// logged here and turned into the matching `LlmError`.
pub(crate) async fn send_json<R: DeserializeOwned>(
    provider: Provider,
    request: reqwest::RequestBuilder,
) -> Result<R, LlmError> {
    let response = request.send().await.map_err(|e| {
        tracing::error!(%provider, error = %e, "{} request error", provider);
        LlmError::Connection {
            provider,
            source: e,
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(
            %provider,
            status = status.as_u16(),
            body = %error_text,
            "{} HTTP error",
            provider
        );
        return Err(LlmError::UpstreamStatus {
            provider,
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(|e| {
        tracing::error!(%provider, error = %e, "{} response body could not be read", provider);
        LlmError::Connection {
            provider,
            source: e,
        }
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::error!(%provider, error = %e, "Unexpected {} response", provider);
        LlmError::Protocol { provider }
    })
}

/// Build an HTTP client with the provider's request ceiling.
pub(crate) fn build_client(timeout: std::time::Duration) -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}
