//! The decision engine: maps an event's shape to exactly one response action.

use crate::base::types::{ChannelKind, ChatEvent, EventKind, Message, ResponseDecision};

/// Case-insensitive phrase that turns a thread mention into a summarize request.
const SUMMARIZE_TRIGGER: &str = "please summarize this";

/// Select the response action for one event.
///
/// The rules below are in priority order and the first match wins; no two
/// rules can fire for one event. `thread_context` is the already-fetched
/// thread history (present only when the event carries a `thread_id`) and
/// `thread_limit` is the configured thread history window.
///
/// 1. Direct messages always get a reply.
/// 2. A passive channel message outside any thread is classified first and
///    answered only if the classifier says it needs a follow-up.
/// 3. A passive reply inside an existing channel thread continues the
///    conversation only if the bot already participated in that thread and
///    the thread still fits inside the history window; otherwise it is
///    ignored. This keeps the bot from barging into threads it was never
///    invited to, and from tail-chasing unboundedly long conversations.
/// 4. A thread mention containing the summarize phrase requests a digest.
/// 5. Any other thread mention continues the conversation.
/// 6. A mention outside a thread gets the fixed "mention me in a thread"
///    instruction.
///
/// One-shot per event; no time-based state.
pub fn decide(event: &ChatEvent, thread_context: Option<&[Message]>, thread_limit: usize) -> ResponseDecision {
    // Rule 1: DMs always get a reply, regardless of content.
    if event.channel_kind == ChannelKind::Direct {
        return ResponseDecision::DirectReply;
    }

    match event.event_kind {
        EventKind::Message => {
            if event.channel_kind != ChannelKind::Channel {
                return ResponseDecision::Ignore;
            }

            match (&event.thread_id, thread_context) {
                // Rule 2: freestanding channel question.
                (None, _) => ResponseDecision::ClassifyThenMaybeReply,
                // Rule 3: passive reply inside an existing thread.
                (Some(_), Some(thread)) => {
                    let bot_participated = thread.iter().any(|m| m.sender_id.as_deref() == Some(event.bot_id.as_str()));

                    if bot_participated && thread.len() < thread_limit {
                        ResponseDecision::ThreadReply
                    } else {
                        ResponseDecision::Ignore
                    }
                }
                // Thread reply with no fetchable history: nothing to continue.
                (Some(_), None) => ResponseDecision::Ignore,
            }
        }
        EventKind::Mention => match &event.thread_id {
            // Rules 4 and 5: mentions inside a thread.
            Some(_) => {
                if event.text.to_lowercase().contains(SUMMARIZE_TRIGGER) {
                    ResponseDecision::Summarize
                } else {
                    ResponseDecision::ThreadReply
                }
            }
            // Rule 6: mention outside any thread.
            None => ResponseDecision::PromptForMention,
        },
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    const THREAD_LIMIT: usize = 20;

    fn event(channel_kind: ChannelKind, event_kind: EventKind, thread_id: Option<&str>, text: &str) -> ChatEvent {
        ChatEvent {
            channel_id: "C123".to_string(),
            channel_kind,
            event_kind,
            text: text.to_string(),
            thread_id: thread_id.map(str::to_string),
            sender_id: "U111".to_string(),
            bot_id: "UBOT".to_string(),
        }
    }

    fn thread_with(senders: &[&str]) -> Vec<Message> {
        senders.iter().enumerate().map(|(i, s)| Message::new(*s, "text", i.to_string())).collect()
    }

    #[test]
    fn test_dm_is_always_direct_reply() {
        for (event_kind, text) in [
            (EventKind::Message, "hello"),
            (EventKind::Message, "please summarize this"),
            (EventKind::Mention, "anything"),
        ] {
            let e = event(ChannelKind::Direct, event_kind, None, text);
            assert_eq!(decide(&e, None, THREAD_LIMIT), ResponseDecision::DirectReply);
        }
    }

    #[test]
    fn test_passive_channel_message_is_classified() {
        let e = event(ChannelKind::Channel, EventKind::Message, None, "how do I enable feature flags?");
        assert_eq!(decide(&e, None, THREAD_LIMIT), ResponseDecision::ClassifyThenMaybeReply);
    }

    #[test]
    fn test_passive_group_message_is_ignored() {
        let e = event(ChannelKind::Group, EventKind::Message, None, "anyone around?");
        assert_eq!(decide(&e, None, THREAD_LIMIT), ResponseDecision::Ignore);
    }

    #[test]
    fn test_passive_thread_reply_continues_when_bot_participated() {
        let e = event(ChannelKind::Channel, EventKind::Message, Some("1.0"), "thanks, and one more thing");
        let thread = thread_with(&["U111", "UBOT", "U111"]);

        assert_eq!(decide(&e, Some(&thread), THREAD_LIMIT), ResponseDecision::ThreadReply);
    }

    #[test]
    fn test_passive_thread_reply_ignored_when_bot_never_participated() {
        let e = event(ChannelKind::Channel, EventKind::Message, Some("1.0"), "following up");
        let thread = thread_with(&["U111", "U222"]);

        assert_eq!(decide(&e, Some(&thread), THREAD_LIMIT), ResponseDecision::Ignore);
    }

    #[test]
    fn test_passive_thread_reply_ignored_when_window_exceeded() {
        let e = event(ChannelKind::Channel, EventKind::Message, Some("1.0"), "still going");
        let senders: Vec<&str> = std::iter::repeat("U111").take(THREAD_LIMIT - 1).chain(std::iter::once("UBOT")).collect();
        let thread = thread_with(&senders);

        assert_eq!(decide(&e, Some(&thread), THREAD_LIMIT), ResponseDecision::Ignore);
    }

    #[test]
    fn test_thread_mention_with_summarize_phrase() {
        for text in [
            "please summarize this",
            "Hey bot, PLEASE SUMMARIZE THIS thread!",
            "  Please Summarize This.  ",
        ] {
            let e = event(ChannelKind::Channel, EventKind::Mention, Some("1.0"), text);
            assert_eq!(decide(&e, Some(&[]), THREAD_LIMIT), ResponseDecision::Summarize, "text: {text:?}");
        }
    }

    #[test]
    fn test_thread_mention_without_phrase_is_thread_reply() {
        let e = event(ChannelKind::Channel, EventKind::Mention, Some("1.0"), "what do you think?");
        assert_eq!(decide(&e, Some(&[]), THREAD_LIMIT), ResponseDecision::ThreadReply);
    }

    #[test]
    fn test_summarize_wins_over_thread_reply() {
        // Rules are priority ordered: the summarize phrase beats plain continuation.
        let e = event(ChannelKind::Channel, EventKind::Mention, Some("1.0"), "could you please summarize this and reply?");
        assert_eq!(decide(&e, Some(&[]), THREAD_LIMIT), ResponseDecision::Summarize);
    }

    #[test]
    fn test_mention_outside_thread_prompts_for_mention() {
        let e = event(ChannelKind::Channel, EventKind::Mention, None, "please summarize this");
        assert_eq!(decide(&e, None, THREAD_LIMIT), ResponseDecision::PromptForMention);
    }
}
