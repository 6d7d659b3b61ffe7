//! Executes a response decision against the correct reply target.

use tracing::{debug, error, instrument, warn};

use crate::{
    base::{
        config::Config,
        prompts,
        types::{ChatEvent, ConversationTurn, Error, Message, Res, ResponseDecision, Void},
    },
    engine::{context, summarizer},
    service::{chat::ChatClient, llm::LlmClient, qa::QaClient},
};

/// Execute the selected action for one event.
///
/// Replies are anchored to the event's thread when present, otherwise to the
/// channel root. `thread_context` is the pre-fetched thread history for
/// events that carry a `thread_id`.
///
/// Failure behavior per variant: an unavailable classifier fails closed
/// (silence), an unavailable completion provider yields a fixed apology post
/// rather than a partial reply, and an undeliverable final reply is logged
/// without retry.
#[instrument(skip_all, fields(decision = ?decision, channel = %event.channel_id))]
pub async fn route(
    decision: ResponseDecision,
    event: &ChatEvent,
    thread_context: Option<&[Message]>,
    chat: &ChatClient,
    llm: &LlmClient,
    qa: &QaClient,
    config: &Config,
) -> Void {
    match decision {
        ResponseDecision::Ignore => Ok(()),

        ResponseDecision::PromptForMention => {
            // Fixed instructional message, no model call involved.
            post_logged(chat, &event.channel_id, prompts::MENTION_INSTRUCTION, event.thread_id.as_deref()).await
        }

        ResponseDecision::DirectReply => {
            let history = chat.fetch_history(&event.channel_id, config.chat_history_limit).await?;
            let turns = context::build_history(&history, &event.bot_id)?;
            let reply = complete_or_apologize(llm, Some(prompts::get_chat_system_prompt(config)), &turns).await?;

            post_logged(chat, &event.channel_id, &reply, event.thread_id.as_deref()).await
        }

        ResponseDecision::ClassifyThenMaybeReply => {
            // The recent window informs operators via tracing; the classifier
            // itself only sees the raw event text.
            let scan = chat.fetch_history(&event.channel_id, config.channel_scan_limit).await?;
            debug!("Scanned {} recent channel messages before classifying.", scan.len());

            let needs_follow_up = match qa.classify(&event.text).await {
                Ok(verdict) => verdict,
                Err(Error::ClassificationUnavailable(err)) => {
                    // Fail closed: silence beats an unprompted reply.
                    warn!("Classifier unavailable, ignoring message: {err}");
                    return Ok(());
                }
                Err(err) => return Err(err),
            };

            if !needs_follow_up {
                debug!("Classifier declined a follow-up.");
                return Ok(());
            }

            let answer = match qa.answer(&event.text).await {
                Ok(answer) => answer,
                Err(Error::ClassificationUnavailable(err)) => {
                    warn!("Answer retrieval unavailable, ignoring message: {err}");
                    return Ok(());
                }
                Err(err) => return Err(err),
            };

            post_logged(chat, &event.channel_id, &answer, None).await
        }

        ResponseDecision::ThreadReply => {
            let thread = match (thread_context, &event.thread_id) {
                (Some(thread), _) => thread.to_vec(),
                (None, Some(ts)) => chat.fetch_thread(&event.channel_id, ts, config.chat_history_limit).await?,
                (None, None) => chat.fetch_history(&event.channel_id, config.chat_history_limit).await?,
            };

            let turns = context::build_history(&thread, &event.bot_id)?;
            let reply = complete_or_apologize(llm, Some(prompts::get_chat_system_prompt(config)), &turns).await?;

            post_logged(chat, &event.channel_id, &reply, event.thread_id.as_deref()).await
        }

        ResponseDecision::Summarize => {
            let thread_ts = event
                .thread_id
                .as_deref()
                .ok_or_else(|| Error::Other(anyhow::anyhow!("summarize decision outside a thread")))?;

            // The acknowledgement must land before the digest; if it cannot be
            // delivered, the digest is not posted either.
            chat.post(&event.channel_id, prompts::SUMMARIZE_ACK, Some(thread_ts)).await?;

            let thread = match thread_context {
                Some(thread) => thread.to_vec(),
                None => chat.fetch_thread(&event.channel_id, thread_ts, config.chat_history_limit).await?,
            };

            let digest = match summarizer::summarize(llm, &thread).await {
                Ok(digest) => digest,
                Err(Error::CompletionUnavailable(err)) => {
                    warn!("Completion provider unavailable, posting apology: {err}");
                    prompts::COMPLETION_APOLOGY.to_string()
                }
                Err(err) => return Err(err),
            };

            post_logged(chat, &event.channel_id, &digest, Some(thread_ts)).await
        }
    }
}

/// Run a completion, substituting the fixed apology text when the provider is
/// unavailable so the user is never left hanging on a silent failure.
async fn complete_or_apologize(llm: &LlmClient, system_prompt: Option<&str>, turns: &[ConversationTurn]) -> Res<String> {
    match llm.complete(system_prompt, turns).await {
        Ok(text) => Ok(text),
        Err(Error::CompletionUnavailable(err)) => {
            warn!("Completion provider unavailable, posting apology: {err}");
            Ok(prompts::COMPLETION_APOLOGY.to_string())
        }
        Err(err) => Err(err),
    }
}

/// Post a reply, logging (not propagating) delivery failures. Retries, if
/// any, belong to the chat platform client.
async fn post_logged(chat: &ChatClient, channel_id: &str, text: &str, thread_ts: Option<&str>) -> Void {
    if let Err(err) = chat.post(channel_id, text, thread_ts).await {
        error!("Reply could not be delivered: {err}");
    }

    Ok(())
}
