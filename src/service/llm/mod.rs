pub mod openai;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{ConversationTurn, Res};

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This trait defines the core functionality for interacting with large
/// language models. Implementing this trait allows different completion
/// providers to be used with the support bot.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Run one completion over an ordered conversation.
    ///
    /// Single request/response, no streaming. Implementations must apply a
    /// timeout and surface expiry or provider errors as
    /// [`crate::base::types::Error::CompletionUnavailable`].
    async fn complete(&self, system_prompt: Option<&str>, turns: &[ConversationTurn]) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for
/// `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}
