//! Process configuration
//!
//! Read once at startup from the environment (after `.env` is loaded) and
//! shared read-only for the lifetime of the process.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DEEPSEEK_API_URL: &str = "https://api.deepseek.com/chat/completions";
const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-chat";
const DEFAULT_CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Claude generates noticeably slower, so it gets the longer ceiling.
const DEFAULT_DEEPSEEK_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CLAUDE_TIMEOUT_SECS: u64 = 90;

/// Value of the `anthropic-version` header.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub deepseek: DeepSeekConfig,
    pub claude: ClaudeConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DeepSeekConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub api_version: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let server = ServerConfig {
            host: vars.string_or("HOST", "127.0.0.1"),
            port: vars.parse_or("PORT", 8000),
            static_dir: PathBuf::from(vars.string_or("STATIC_DIR", "static")),
        };

        let deepseek = DeepSeekConfig {
            api_key: vars.secret("DEEPSEEK_API_KEY"),
            api_url: vars.string_or("DEEPSEEK_API_URL", DEFAULT_DEEPSEEK_API_URL),
            model: vars.string_or("DEEPSEEK_MODEL", DEFAULT_DEEPSEEK_MODEL),
            max_tokens: vars.parse_or("DEEPSEEK_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            temperature: vars.parse_or("DEEPSEEK_TEMPERATURE", DEFAULT_TEMPERATURE),
            timeout: Duration::from_secs(
                vars.parse_or("DEEPSEEK_TIMEOUT_SECS", DEFAULT_DEEPSEEK_TIMEOUT_SECS),
            ),
        };

        let claude = ClaudeConfig {
            api_key: vars.secret("CLAUDE_API_KEY"),
            api_url: vars.string_or("CLAUDE_API_URL", DEFAULT_CLAUDE_API_URL),
            model: vars.string_or("CLAUDE_MODEL", DEFAULT_CLAUDE_MODEL),
            max_tokens: vars.parse_or("CLAUDE_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            api_version: ANTHROPIC_VERSION.to_string(),
            timeout: Duration::from_secs(
                vars.parse_or("CLAUDE_TIMEOUT_SECS", DEFAULT_CLAUDE_TIMEOUT_SECS),
            ),
        };

        if deepseek.api_key.is_none() {
            tracing::warn!(
                "DEEPSEEK_API_KEY is not set, DeepSeek requests will fail. Check your .env file"
            );
        }
        if claude.api_key.is_none() {
            tracing::warn!(
                "CLAUDE_API_KEY is not set, Claude requests will fail. Check your .env file"
            );
        }

        Self {
            server,
            deepseek,
            claude,
        }
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string_or(&self, name: &str, default: &str) -> String {
        (self.0)(name)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Empty keys are treated the same as missing ones.
    fn secret(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_or<T>(&self, name: &str, default: T) -> T
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match (self.0)(name) {
            Some(val) => match val.trim().parse() {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, name, e);
                    default
                }
            },
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = config_from(&[]);

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.static_dir, PathBuf::from("static"));

        assert!(config.deepseek.api_key.is_none());
        assert_eq!(config.deepseek.api_url, DEFAULT_DEEPSEEK_API_URL);
        assert_eq!(config.deepseek.model, "deepseek-chat");
        assert_eq!(config.deepseek.max_tokens, 2000);
        assert!((config.deepseek.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.deepseek.timeout, Duration::from_secs(60));

        assert!(config.claude.api_key.is_none());
        assert_eq!(config.claude.api_url, DEFAULT_CLAUDE_API_URL);
        assert_eq!(config.claude.api_version, "2023-06-01");
        assert_eq!(config.claude.timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("DEEPSEEK_API_KEY", "ds-key"),
            ("DEEPSEEK_MODEL", "deepseek-reasoner"),
            ("DEEPSEEK_TEMPERATURE", "0.2"),
            ("CLAUDE_API_KEY", "cl-key"),
            ("CLAUDE_MAX_TOKENS", "4096"),
            ("CLAUDE_TIMEOUT_SECS", "5"),
        ]);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.deepseek.api_key.as_deref(), Some("ds-key"));
        assert_eq!(config.deepseek.model, "deepseek-reasoner");
        assert!((config.deepseek.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.claude.api_key.as_deref(), Some("cl-key"));
        assert_eq!(config.claude.max_tokens, 4096);
        assert_eq!(config.claude.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = config_from(&[("DEEPSEEK_API_KEY", "   "), ("CLAUDE_API_KEY", "")]);

        assert!(config.deepseek.api_key.is_none());
        assert!(config.claude.api_key.is_none());
    }

    #[test]
    fn test_unparsable_number_falls_back_to_default() {
        let config = config_from(&[("DEEPSEEK_MAX_TOKENS", "lots"), ("PORT", "-1")]);

        assert_eq!(config.deepseek.max_tokens, 2000);
        assert_eq!(config.server.port, 8000);
    }
}
