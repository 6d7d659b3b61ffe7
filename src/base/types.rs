//! Common types and result handling for the support bot.

use serde::{Deserialize, Serialize};

/// Result alias using the crate-wide [`Error`] type.
pub type Res<T> = Result<T, Error>;
/// Result alias for operations that return nothing on success.
pub type Void = Res<()>;

/// Failure taxonomy for the triage engine.
///
/// Every external call is wrapped in one of these so a single event's failure
/// can never escape to the Slack delivery layer. The engine treats each
/// variant differently: malformed history drops the event, classification
/// failures fail closed (silence), completion failures produce a fixed
/// apology, and post failures are logged without retry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The chat client returned a message without a sender or text.
    #[error("malformed history: {0}")]
    MalformedHistory(String),
    /// The question classification or answer retrieval service failed.
    #[error("classification service unavailable: {0}")]
    ClassificationUnavailable(#[source] anyhow::Error),
    /// The completion provider errored or timed out.
    #[error("completion provider unavailable: {0}")]
    CompletionUnavailable(#[source] anyhow::Error),
    /// A reply could not be delivered to the chat platform.
    #[error("failed to post reply: {0}")]
    PostFailed(#[source] anyhow::Error),
    /// Any other failure not covered by the variants above.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The kind of conversation an event arrived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// A one-on-one direct message with the bot.
    Direct,
    /// A regular (public) channel.
    Channel,
    /// A private group or multi-party conversation.
    Group,
}

/// How the event was addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// An ordinary message, not addressed to the bot.
    Message,
    /// An @-mention of the bot.
    Mention,
}

/// One inbound chat notification, validated at the Slack boundary.
///
/// Created per event and discarded after handling. `bot_id` is resolved from
/// the push event's `authorizations` metadata on every event rather than
/// cached, since it is supplied per delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Identifier of the channel the event arrived from.
    pub channel_id: String,
    /// The kind of conversation the event arrived from.
    pub channel_kind: ChannelKind,
    /// How the event was addressed.
    pub event_kind: EventKind,
    /// The message text.
    pub text: String,
    /// Thread timestamp if the message is part of a thread.
    pub thread_id: Option<String>,
    /// Identifier of the user who sent the message.
    pub sender_id: String,
    /// Identifier of the bot user, resolved per delivery.
    pub bot_id: String,
}

/// One historical chat message, part of an ordered (oldest-first) sequence.
///
/// The optional fields reflect the untrusted boundary with the chat client;
/// the context builder is the validation surface and fails with
/// [`Error::MalformedHistory`] when either is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier of the user who sent the message, if present.
    pub sender_id: Option<String>,
    /// The message text, if present.
    pub text: Option<String>,
    /// The message timestamp.
    pub ts: String,
}

/// The speaker of a conversation turn, from the completion model's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A turn spoken by the bot.
    Assistant,
    /// A turn spoken by a human user.
    User,
}

/// The normalized unit fed to the completion model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// The speaker of this turn.
    pub role: Role,
    /// The text content of this turn.
    pub content: String,
}

/// The single action selected for an event.
///
/// Computed once per event by the strategy selector, never mutated, and
/// executed by the reply router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDecision {
    /// No reply is warranted.
    Ignore,
    /// Always respond to direct messages, using recent channel history.
    DirectReply,
    /// Passive channel question: ask the classifier, reply only on a yes.
    ClassifyThenMaybeReply,
    /// Continue an existing thread conversation with the full model.
    ThreadReply,
    /// Produce a question/solution digest of the thread.
    Summarize,
    /// Ask the user to mention the bot inside a thread.
    PromptForMention,
}

impl Message {
    /// Convenience constructor for a fully-populated message.
    pub fn new(sender_id: impl Into<String>, text: impl Into<String>, ts: impl Into<String>) -> Self {
        Self {
            sender_id: Some(sender_id.into()),
            text: Some(text.into()),
            ts: ts.into(),
        }
    }
}
