//! Turns raw chat history into role-tagged conversation turns.

use crate::base::types::{ConversationTurn, Error, Message, Res, Role};

/// Build the ordered conversation history for a completion request.
///
/// Role tagging compares each message's sender to the bot identity: the bot's
/// own messages become `assistant` turns, everything else is `user`. Order is
/// preserved (oldest first) so the model sees causally ordered dialogue, and
/// content is carried verbatim with no truncation beyond the caller-supplied
/// window.
///
/// Pure transformation; fails with [`Error::MalformedHistory`] when a message
/// is missing its sender or text.
pub fn build_history(messages: &[Message], bot_id: &str) -> Res<Vec<ConversationTurn>> {
    messages
        .iter()
        .map(|message| {
            let sender = message
                .sender_id
                .as_deref()
                .ok_or_else(|| Error::MalformedHistory(format!("message at ts {} has no sender", message.ts)))?;
            let text = message
                .text
                .as_deref()
                .ok_or_else(|| Error::MalformedHistory(format!("message at ts {} has no text", message.ts)))?;

            Ok(ConversationTurn {
                role: if sender == bot_id { Role::Assistant } else { Role::User },
                content: text.to_string(),
            })
        })
        .collect()
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_and_order_are_preserved() {
        let messages = vec![Message::new("bot", "hi", "1"), Message::new("u1", "hello", "2")];

        let turns = build_history(&messages, "bot").unwrap();

        assert_eq!(
            turns,
            vec![
                ConversationTurn {
                    role: Role::Assistant,
                    content: "hi".to_string()
                },
                ConversationTurn {
                    role: Role::User,
                    content: "hello".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_idempotent_on_identical_input() {
        let messages = vec![Message::new("u1", "one", "1"), Message::new("bot", "two", "2"), Message::new("u2", "three", "3")];

        let first = build_history(&messages, "bot").unwrap();
        let second = build_history(&messages, "bot").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_content_is_verbatim() {
        let text = "  spaced   *and* <formatted>\nmultiline  ";
        let messages = vec![Message::new("u1", text, "1")];

        let turns = build_history(&messages, "bot").unwrap();

        assert_eq!(turns[0].content, text);
    }

    #[test]
    fn test_missing_sender_is_malformed() {
        let messages = vec![Message {
            sender_id: None,
            text: Some("hi".to_string()),
            ts: "1".to_string(),
        }];

        let err = build_history(&messages, "bot").unwrap_err();

        assert!(matches!(err, Error::MalformedHistory(_)));
    }

    #[test]
    fn test_missing_text_is_malformed() {
        let messages = vec![Message {
            sender_id: Some("u1".to_string()),
            text: None,
            ts: "1".to_string(),
        }];

        let err = build_history(&messages, "bot").unwrap_err();

        assert!(matches!(err, Error::MalformedHistory(_)));
    }

    #[test]
    fn test_empty_history_is_empty() {
        assert!(build_history(&[], "bot").unwrap().is_empty());
    }
}
