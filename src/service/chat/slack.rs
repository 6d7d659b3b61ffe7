//! Chat service integration for the support bot.
//!
//! This module provides functionality for interacting with chat platforms like Slack:
//! - Receiving messages, @-mentions, and slash commands
//! - Sending replies to channels and threads
//! - Retrieving channel and thread history
//!
//! Incoming Slack payloads are translated into typed [`ChatEvent`]s at this
//! boundary so the engine never does ad-hoc key lookups.

use crate::{
    base::{
        config::Config,
        prompts,
        types::{ChannelKind, ChatEvent, Error, EventKind, Message, Res, Void},
    },
    engine,
    service::{llm::LlmClient, qa::QaClient},
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::{errors::SlackClientError, prelude::*};
use tracing::{info, instrument, warn};

use std::{ops::Deref, sync::Arc};

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config, llm: LlmClient, qa: QaClient) -> Res<Self> {
        let client = SlackChatClient::new(config, llm, qa).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    config: Config,
    llm: LlmClient,
    qa: QaClient,
    chat: ChatClient,
    bot_user_id: String,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub app_token: SlackApiToken,
    pub bot_token: SlackApiToken,
    pub bot_user_id: String,
    pub client: Arc<FullClient>,
    pub config: Config,
    pub llm: LlmClient,
    pub qa: QaClient,
}

impl Deref for SlackChatClient {
    type Target = FullClient;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config, llm: LlmClient, qa: QaClient) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder()
            .with_native_roots()
            .map_err(anyhow::Error::from)?
            .https_only()
            .enable_all_versions()
            .build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Get the bot's user ID as a fallback identity for events whose
        // delivery metadata carries no authorizations.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await.map_err(anyhow::Error::from)?;
        let bot_user_id = bot_user.user_id.0;

        info!("Slack bot user ID: {}", bot_user_id);

        Ok(Self {
            app_token,
            bot_token,
            bot_user_id,
            client,
            config: config.clone(),
            llm,
            qa,
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    async fn start(&self) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new()
            .with_command_events(handle_command_event)
            .with_interaction_events(handle_interaction_event)
            .with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            config: self.config.clone(),
            llm: self.llm.clone(),
            qa: self.qa.clone(),
            bot_user_id: self.bot_user_id.clone(),
            chat: ChatClient::from(self.clone()),
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register an app token to listen for events,
        socket_mode_listener.listen_for(&self.app_token).await.map_err(anyhow::Error::from)?;

        // Start WS connections calling Slack API to get WS url for the token,
        // and wait for Ctrl-C to shutdown.
        socket_mode_listener.serve().await;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_history(&self, channel_id: &str, limit: u16) -> Res<Vec<Message>> {
        let request = SlackApiConversationsHistoryRequest::new()
            .with_channel(SlackChannelId(channel_id.to_string()))
            .with_limit(limit);

        let session = self.client.open_session(&self.bot_token);
        let response = session
            .conversations_history(&request)
            .await
            .map_err(|e| Error::Other(anyhow::anyhow!("Failed to fetch channel history: {}", e)))?;

        // Slack returns channel history newest first; the engine expects
        // causal (oldest first) order.
        let mut messages: Vec<Message> = response.messages.iter().map(to_message).collect();
        messages.reverse();

        Ok(messages)
    }

    #[instrument(skip(self))]
    async fn fetch_thread(&self, channel_id: &str, thread_ts: &str, limit: u16) -> Res<Vec<Message>> {
        let request = SlackApiConversationsRepliesRequest::new(SlackChannelId(channel_id.to_string()), SlackTs(thread_ts.to_string())).with_limit(limit);

        let session = self.client.open_session(&self.bot_token);
        let response = session.conversations_replies(&request).await;

        let response = if let Err(e) = &response
            && let SlackClientError::ApiError(ae) = e
            && ae.code == "thread_not_found"
        {
            // A top-level message has no replies yet; that is an empty thread,
            // not a failure.
            return Ok(Vec::new());
        } else {
            response.map_err(|e| Error::Other(anyhow::anyhow!("Failed to fetch thread: {}", e)))?
        };

        // conversations.replies is already oldest first.
        Ok(response.messages.iter().map(to_message).collect())
    }

    #[instrument(skip(self, text))]
    async fn post(&self, channel_id: &str, text: &str, thread_ts: Option<&str>) -> Void {
        let message = SlackMessageContent::new().with_text(text.to_string());

        let mut request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message)
            .with_as_user(true)
            .with_link_names(true);

        if let Some(thread_ts) = thread_ts {
            request = request.with_thread_ts(SlackTs(thread_ts.to_string()));
        }

        let session = self.client.open_session(&self.bot_token);

        let _ = session
            .chat_post_message(&request)
            .await
            .map_err(|e| Error::PostFailed(anyhow::anyhow!("Failed to send message: {}", e)))?;

        Ok(())
    }
}

// Boundary translation.

/// Map a Slack history message into the engine's message type.
///
/// Missing fields are carried as `None`; the context builder is the
/// validation surface.
fn to_message(message: &SlackHistoryMessage) -> Message {
    Message {
        sender_id: message
            .sender
            .user
            .as_ref()
            .map(|u| u.0.clone())
            .or_else(|| message.sender.bot_id.as_ref().map(|b| b.0.clone())),
        text: message.content.text.clone(),
        ts: message.origin.ts.0.clone(),
    }
}

/// Map a Slack channel type string to the engine's channel kind.
fn to_channel_kind(channel_type: Option<&str>) -> Option<ChannelKind> {
    match channel_type {
        Some("im") => Some(ChannelKind::Direct),
        Some("channel") => Some(ChannelKind::Channel),
        Some("group") | Some("mpim") => Some(ChannelKind::Group),
        _ => None,
    }
}

/// Resolve the bot identity for one delivery.
///
/// Prefers the push event's `authorizations` metadata (supplied per call),
/// falling back to the identity cached from `auth.test` at startup.
fn resolve_bot_id(callback: &SlackPushEventCallback, fallback: &str) -> String {
    callback
        .authorizations
        .as_ref()
        .and_then(|auths| auths.first())
        .map(|auth| auth.user_id.0.clone())
        .unwrap_or_else(|| fallback.to_string())
}

// Socket mode listener callbacks for Slack.

/// Handles command events from Slack with a static acknowledgement.
async fn handle_command_event(
    event: SlackCommandEvent,
    _client: Arc<SlackHyperClient>,
    _states: SlackClientEventsUserState,
) -> Result<SlackCommandEventResponse, Box<dyn std::error::Error + Send + Sync>> {
    info!("[COMMAND] {:#?}", event.command);
    Ok(SlackCommandEventResponse::new(SlackMessageContent::new().with_text(prompts::COMMAND_REPLY.into())))
}

/// Handles interaction events from Slack.
async fn handle_interaction_event(event: SlackInteractionEvent, _client: Arc<SlackHyperClient>, _states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    warn!("[INTERACTION] {:#?}", event);
    Ok(())
}

/// Handles push events from Slack, translating them into typed chat events
/// for the engine.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    let bot_id = resolve_bot_id(&event_callback, &user_state.bot_user_id);

    match &event_callback.event {
        SlackEventCallbackBody::Message(message_event) => {
            info!("Received message event ...");

            let Some(channel_id) = message_event.origin.channel.as_ref().map(|c| c.0.clone()) else {
                warn!("Skipping message event without a channel.");
                return Ok(());
            };

            let Some(channel_kind) = to_channel_kind(message_event.origin.channel_type.as_ref().map(|ct| ct.0.as_str())) else {
                warn!("Skipping message event with unknown channel type.");
                return Ok(());
            };

            let sender_id = message_event
                .sender
                .user
                .as_ref()
                .map(|u| u.0.clone())
                .or_else(|| message_event.sender.bot_id.as_ref().map(|b| b.0.clone()))
                .unwrap_or_default();

            // Never respond to our own messages.
            if sender_id == bot_id {
                return Ok(());
            }

            let text = message_event.content.as_ref().and_then(|c| c.text.clone()).unwrap_or_default();

            // If the message @-mentions the bot, skip and let the app mention
            // handler take care of it.
            if text.contains(&bot_id) {
                warn!("Skipping message event because it mentions the bot.");
                return Ok(());
            }

            let event = ChatEvent {
                channel_id,
                channel_kind,
                event_kind: EventKind::Message,
                text,
                thread_id: message_event.origin.thread_ts.as_ref().map(|ts| ts.0.clone()),
                sender_id,
                bot_id,
            };

            engine::handle_event(event, user_state.chat.clone(), user_state.llm.clone(), user_state.qa.clone(), user_state.config.clone());
        }
        SlackEventCallbackBody::AppMention(mention_event) => {
            info!("Received app mention event ...");

            let event = ChatEvent {
                channel_id: mention_event.channel.0.clone(),
                channel_kind: ChannelKind::Channel,
                event_kind: EventKind::Mention,
                text: mention_event.content.text.clone().unwrap_or_default(),
                thread_id: mention_event.origin.thread_ts.as_ref().map(|ts| ts.0.clone()),
                sender_id: mention_event.user.0.clone(),
                bot_id,
            };

            engine::handle_event(event, user_state.chat.clone(), user_state.llm.clone(), user_state.qa.clone(), user_state.config.clone());
        }
        _ => {
            warn!("Received unhandled push event.")
        }
    }

    Ok(())
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_kind_mapping() {
        assert_eq!(to_channel_kind(Some("im")), Some(ChannelKind::Direct));
        assert_eq!(to_channel_kind(Some("channel")), Some(ChannelKind::Channel));
        assert_eq!(to_channel_kind(Some("group")), Some(ChannelKind::Group));
        assert_eq!(to_channel_kind(Some("mpim")), Some(ChannelKind::Group));
        assert_eq!(to_channel_kind(Some("weird")), None);
        assert_eq!(to_channel_kind(None), None);
    }
}
