//! Runtime services and shared state for the support bot.

use tracing::instrument;

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{chat::ChatClient, llm::LlmClient, qa::QaClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the chat client, the LLM client, the QA client, and the
/// configuration. It is designed to be trivially cloneable, allowing it to be
/// passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The question classification / answer retrieval client instance.
    pub qa: QaClient,
    /// The slack client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the LLM client.
        let llm = LlmClient::openai(&config);

        // Initialize the QA client.
        let qa = QaClient::http(&config)?;

        // Initialize the slack client.
        let chat = ChatClient::slack(&config, llm.clone(), qa.clone()).await?;

        Ok(Self { config, llm, qa, chat })
    }

    pub async fn start(&self) -> Void {
        self.chat.start().await
    }
}
