//! The event-triage and context-assembly engine.
//!
//! This module turns one inbound chat event into at most one response flow:
//! - `selector` classifies the event into a single response decision.
//! - `context` assembles the ordered, role-tagged conversation history.
//! - `summarizer` builds thread digests.
//! - `router` executes the decision against the correct reply target.

pub mod context;
pub mod router;
pub mod selector;
pub mod summarizer;

use tracing::{Instrument, error, instrument};

use crate::{
    base::{
        config::Config,
        types::{ChatEvent, Void},
    },
    service::{chat::ChatClient, llm::LlmClient, qa::QaClient},
};

/// Handle one inbound chat event in the background.
///
/// Spawns a task per event; events on different channels and threads carry no
/// shared mutable state, so concurrent handling needs no coordination. Errors
/// are logged here and never propagate to the delivery layer.
#[instrument(skip_all)]
pub fn handle_event(event: ChatEvent, chat: ChatClient, llm: LlmClient, qa: QaClient, config: Config) {
    tokio::spawn(async move {
        // Process the event.
        let result = handle_event_internal(&event, &chat, &llm, &qa, &config).in_current_span().await;

        // Log any errors.
        if let Err(err) = &result {
            error!("Error while handling: {}", err);
        }
    });
}

/// Handle one inbound chat event to completion.
///
/// Sequential per event: fetch the thread window if the event sits inside a
/// thread, select the response decision, then route it. Exposed separately
/// from [`handle_event`] so tests can await the full flow.
#[instrument(skip_all, fields(channel = %event.channel_id))]
pub async fn handle_event_internal(event: &ChatEvent, chat: &ChatClient, llm: &LlmClient, qa: &QaClient, config: &Config) -> Void {
    let thread_context = match &event.thread_id {
        Some(thread_ts) => Some(chat.fetch_thread(&event.channel_id, thread_ts, config.chat_history_limit).await?),
        None => None,
    };

    let decision = selector::decide(event, thread_context.as_deref(), config.chat_history_limit as usize);

    router::route(decision, event, thread_context.as_deref(), chat, llm, qa, config).await
}
