//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::prompts;

use super::types::Res;

/// Default OpenAI model used for chat continuation and summarization.
fn default_openai_model() -> String {
    "gpt-4.1-mini".to_string()
}

/// Default sampling temperature for the completion model.
fn default_openai_temperature() -> f32 {
    0.7
}

/// Default max output tokens for the completion model.
fn default_openai_max_tokens() -> u32 {
    4096
}

/// Default timeout for one completion call, in seconds.
fn default_completion_timeout_secs() -> u64 {
    60
}

/// Default timeout for classification / answer retrieval calls, in seconds.
fn default_qa_timeout_secs() -> u64 {
    10
}

/// Default history window for direct-message and thread fetches.
fn default_chat_history_limit() -> u16 {
    20
}

/// Default history window for passive channel scans.
fn default_channel_scan_limit() -> u16 {
    5
}

/// Default system prompt for chat continuations.
fn default_chat_system_prompt() -> String {
    prompts::CHAT_SYSTEM_PROMPT.to_string()
}

/// Configuration for the support-bot application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Shared inner configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// The concrete configuration values behind [`Config`].
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// OpenAI API key (`OPENAI_API_KEY`).
    pub openai_api_key: String,
    /// OpenAI model to use (`OPENAI_MODEL`).
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Sampling temperature for the completion model (`OPENAI_TEMPERATURE`).
    /// Value between 0 and 2. Higher values like 0.8 make output more random,
    /// while lower values like 0.2 make it more focused and deterministic.
    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,
    /// Max output tokens for the completion model (`OPENAI_MAX_TOKENS`).
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// Timeout for a single completion call, in seconds (`COMPLETION_TIMEOUT_SECS`).
    /// Expiry is treated as a provider failure, never as indefinite blocking.
    #[serde(default = "default_completion_timeout_secs")]
    pub completion_timeout_secs: u64,
    /// Timeout for classification and answer retrieval calls, in seconds (`QA_TIMEOUT_SECS`).
    #[serde(default = "default_qa_timeout_secs")]
    pub qa_timeout_secs: u64,
    /// Message window for DM and thread history fetches (`CHAT_HISTORY_LIMIT`).
    #[serde(default = "default_chat_history_limit")]
    pub chat_history_limit: u16,
    /// Message window for passive channel scans (`CHANNEL_SCAN_LIMIT`).
    #[serde(default = "default_channel_scan_limit")]
    pub channel_scan_limit: u16,
    /// Optional custom system prompt for chat continuations (`CHAT_SYSTEM_PROMPT`).
    #[serde(default = "default_chat_system_prompt")]
    pub chat_system_prompt: String,
    /// Slack app token (`SLACK_APP_TOKEN`).
    pub slack_app_token: String,
    /// Slack bot token (`SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// Slack signing secret (`SLACK_SIGNING_SECRET`).
    pub slack_signing_secret: String,
    /// Question classification service endpoint (`CLASSIFIER_ENDPOINT`).
    pub classifier_endpoint: String,
    /// Answer retrieval service endpoint (`ANSWERS_ENDPOINT`).
    pub answers_endpoint: String,
}

impl Config {
    /// Load configuration from the environment and an optional TOML file.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("SUPPORT_BOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build().map_err(anyhow::Error::from)?.try_deserialize().map_err(anyhow::Error::from)?),
        };

        if result.openai_temperature < 0.0 || result.openai_temperature > 2.0 {
            return Err(anyhow::anyhow!("OpenAI temperature must be between 0 and 2.").into());
        }

        if result.openai_max_tokens < 1 || result.openai_max_tokens > 128000 {
            return Err(anyhow::anyhow!("OpenAI max tokens must be between 1 and 128000.").into());
        }

        if result.chat_history_limit == 0 || result.channel_scan_limit == 0 {
            return Err(anyhow::anyhow!("History limits must be at least 1.").into());
        }

        Ok(result)
    }
}
