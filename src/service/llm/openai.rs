//! Integration with Large Language Model services.
//!
//! This module provides a thin wrapper around LLM clients (e.g., OpenAI)
//! for generating conversational replies and thread digests. It implements
//! the `GenericLlmClient` trait with a default implementation for OpenAI's
//! chat completions API.

use std::{sync::Arc, time::Duration};

use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{info, instrument};

use crate::base::{
    config::Config,
    types::{ConversationTurn, Error, Res, Role},
};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    config: Config,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());

        Self {
            client: Client::with_config(cfg),
            config: config.clone(),
        }
    }

    /// Map the conversation into chat completion request messages.
    fn build_messages(&self, system_prompt: Option<&str>, turns: &[ConversationTurn]) -> Res<Vec<ChatCompletionRequestMessage>> {
        let mut messages = Vec::with_capacity(turns.len() + 1);

        if let Some(system_prompt) = system_prompt {
            messages.push(ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(anyhow::Error::from)?,
            ));
        }

        for turn in turns {
            let message = match turn.role {
                Role::Assistant => ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessageArgs::default()
                        .content(turn.content.clone())
                        .build()
                        .map_err(anyhow::Error::from)?,
                ),
                Role::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(turn.content.clone())
                        .build()
                        .map_err(anyhow::Error::from)?,
                ),
            };

            messages.push(message);
        }

        Ok(messages)
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::complete", skip_all)]
    async fn complete(&self, system_prompt: Option<&str>, turns: &[ConversationTurn]) -> Res<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.openai_model)
            .temperature(self.config.openai_temperature)
            .max_completion_tokens(self.config.openai_max_tokens)
            .messages(self.build_messages(system_prompt, turns)?)
            .build()
            .map_err(anyhow::Error::from)?;

        // One request, one response; expiry is a provider failure, not a hang.
        let response = match timeout(Duration::from_secs(self.config.completion_timeout_secs), self.client.chat().create(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(Error::CompletionUnavailable(err.into())),
            Err(_) => {
                return Err(Error::CompletionUnavailable(anyhow::anyhow!(
                    "completion timed out after {}s",
                    self.config.completion_timeout_secs
                )));
            }
        };

        info!("Completion returned {} choices.", response.choices.len());

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| Error::CompletionUnavailable(anyhow::anyhow!("completion returned no content")))
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::config::ConfigInner;

    fn create_test_config() -> Config {
        Config {
            inner: Arc::new(ConfigInner {
                openai_api_key: "test_key".to_string(),
                openai_model: "gpt-4.1-mini".to_string(),
                openai_temperature: 0.7,
                openai_max_tokens: 200,
                completion_timeout_secs: 5,
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_build_messages_includes_system_prompt_first() {
        let client = OpenAiLlmClient::new(&create_test_config());
        let turns = vec![ConversationTurn {
            role: Role::User,
            content: "hi".to_string(),
        }];

        let messages = client.build_messages(Some("be helpful"), &turns).unwrap();

        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_build_messages_preserves_roles_and_order() {
        let client = OpenAiLlmClient::new(&create_test_config());
        let turns = vec![
            ConversationTurn {
                role: Role::Assistant,
                content: "hello".to_string(),
            },
            ConversationTurn {
                role: Role::User,
                content: "hey".to_string(),
            },
        ];

        let messages = client.build_messages(None, &turns).unwrap();

        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::Assistant(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
    }
}
