pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Message, Res, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat
/// platforms like Slack. Implementing this trait allows different chat
/// services to be used with the support bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot user ID.
    ///
    /// The authenticated identity of the bot, used as a fallback when an
    /// event's delivery metadata does not carry one.
    fn bot_user_id(&self) -> &str;

    /// Start the chat client listener.
    ///
    /// Sets up event listeners for the chat platform and begins processing
    /// incoming messages and events.
    async fn start(&self) -> Void;

    /// Fetch the most recent messages in a channel, oldest first.
    async fn fetch_history(&self, channel_id: &str, limit: u16) -> Res<Vec<Message>>;

    /// Fetch the messages of a thread, oldest first.
    async fn fetch_thread(&self, channel_id: &str, thread_ts: &str, limit: u16) -> Res<Vec<Message>>;

    /// Post a message, anchored to a thread when `thread_ts` is given,
    /// otherwise to the channel root.
    async fn post(&self, channel_id: &str, text: &str, thread_ts: Option<&str>) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
