//! Provider routing
//!
//! Pure dispatch from a `Provider` to its client. No retries and no fallback
//! between providers: a failing provider's error is returned as-is.

use std::sync::Arc;

use super::{ChatProvider, ClaudeClient, DeepSeekClient, Provider};
use crate::config::Config;
use crate::error::LlmError;
use crate::prompts::PromptPair;

#[derive(Clone)]
pub struct LlmRouter {
    deepseek: Arc<dyn ChatProvider>,
    claude: Arc<dyn ChatProvider>,
}

impl LlmRouter {
    pub fn new(deepseek: Arc<dyn ChatProvider>, claude: Arc<dyn ChatProvider>) -> Self {
        Self { deepseek, claude }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            Arc::new(DeepSeekClient::new(config.deepseek.clone())?),
            Arc::new(ClaudeClient::new(config.claude.clone())?),
        ))
    }

    pub fn client(&self, provider: Provider) -> &dyn ChatProvider {
        match provider {
            Provider::Claude => self.claude.as_ref(),
            Provider::DeepSeek => self.deepseek.as_ref(),
        }
    }

    pub async fn invoke(
        &self,
        provider: Provider,
        prompt: &PromptPair,
    ) -> Result<String, LlmError> {
        let client = self.client(provider);
        tracing::debug!(provider = %client.provider(), "Dispatching completion");
        client
            .complete(&prompt.system_prompt, &prompt.user_prompt)
            .await
    }
}
