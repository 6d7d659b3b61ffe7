//! Thread digests: extracts question/solution pairs from a transcript.

use crate::{
    base::{
        prompts,
        types::{ConversationTurn, Message, Res, Role},
    },
    service::llm::LlmClient,
};

/// Render a thread transcript for the extraction prompt.
///
/// Messages are rendered oldest first, one per line, with text carried
/// verbatim. Messages missing a sender are attributed to `unknown` rather
/// than dropped, so the model still sees the complete conversation.
pub fn format_transcript(thread: &[Message]) -> String {
    thread
        .iter()
        .map(|m| format!("{}: {}", m.sender_id.as_deref().unwrap_or("unknown"), m.text.as_deref().unwrap_or("")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the fixed extraction prompt for a thread.
///
/// The prompt instructs the model to treat only the initiating user's
/// questions as relevant, produce one `Question: … / Solution: …` pair per
/// distinct question, and fall back to a fixed support-channel pointer when
/// no resolution is evident. The transcript is embedded whole and unreordered.
pub fn build_summary_prompt(thread: &[Message]) -> String {
    format!("{}{}", prompts::summarize_preamble(), format_transcript(thread))
}

/// Summarize a thread into a question/solution digest.
///
/// One completion call, no streaming. The model's text is returned unmodified;
/// the `Question:`/`Solution:` structure is not parsed or enforced here, that
/// is left to downstream consumers.
pub async fn summarize(llm: &LlmClient, thread: &[Message]) -> Res<String> {
    let turns = vec![ConversationTurn {
        role: Role::User,
        content: build_summary_prompt(thread),
    }];

    llm.complete(None, &turns).await
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_transcript_verbatim_and_in_order() {
        let thread = vec![
            Message::new("u1", "How do I rotate my API key?", "1"),
            Message::new("u2", "Which project is this for?", "2"),
            Message::new("u1", "The production one — and it has *markdown*.", "3"),
        ];

        let prompt = build_summary_prompt(&thread);

        for m in &thread {
            assert!(prompt.contains(m.text.as_deref().unwrap()));
        }

        let first = prompt.find("How do I rotate my API key?").unwrap();
        let second = prompt.find("Which project is this for?").unwrap();
        let third = prompt.find("The production one").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_prompt_contains_fallback_directive() {
        let prompt = build_summary_prompt(&[]);

        assert!(prompt.contains(crate::base::prompts::NO_SOLUTION_FALLBACK));
        assert!(prompt.contains("Question: <question>"));
        assert!(prompt.contains("Solution: <solution>"));
    }

    #[test]
    fn test_transcript_tolerates_missing_fields() {
        let thread = vec![Message {
            sender_id: None,
            text: None,
            ts: "1".to_string(),
        }];

        assert_eq!(format_transcript(&thread), "unknown: ");
    }
}
