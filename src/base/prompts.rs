//! Prompt templates and fixed reply texts for LLM usage.

use crate::base::config::Config;

/// System prompt for AI chat continuations (DMs and thread replies).
pub const CHAT_SYSTEM_PROMPT: &str = r#####"
You are the trusty support bot on this team's Slack, named Max.
Please continue the conversation in a way that is helpful to the user and also makes the user feel like they are talking to a human.
Only suggest using this team's products and services. Do not suggest products or services from other companies.
"#####;

/// Preamble for the thread summarization prompt. The thread transcript is
/// appended verbatim after this text.
pub const SUMMARIZE_PREAMBLE: &str = r#####"The following is a conversation in which the first person asks a question. Eventually, after the second person may ask some clarifying questions to gain more context, a solution may be reached.
There may be multiple questions and solutions in the conversation, but only questions from the initial person should be considered relevant - questions from other people are just for
clarifications about the first user's problem. Summarize each question and its solution succinctly, excluding distinct user information but mostly just parsing out the relevant content,
the question that was asked in detail including important context, and the eventual solution. If no solution seems to have been reached, say 'NO_SOLUTION_FALLBACK'.
Respond in the format of:
Question: <question>
Solution: <solution>
Here is the conversation: "#####;

/// What the summary must say when a thread reached no resolution.
pub const NO_SOLUTION_FALLBACK: &str = "reach out in the human support channel";

/// Posted when the bot is mentioned outside of a thread.
pub const MENTION_INSTRUCTION: &str = "Please mention me in a thread. I'm a little shy. :sleeping:";

/// Posted immediately when a summarization is requested, before the digest.
pub const SUMMARIZE_ACK: &str = "On it!";

/// Posted in place of a reply when the completion provider is unavailable.
pub const COMPLETION_APOLOGY: &str = "Sorry, I couldn't come up with a response just now. Please try again in a little while.";

/// Static reply for the slash command surface.
pub const COMMAND_REPLY: &str = "Mention me in a thread with \"please summarize this\" and I'll post a digest there.";

/// Get the chat system prompt, using the config override if provided.
pub fn get_chat_system_prompt(config: &Config) -> &str {
    &config.chat_system_prompt
}

/// Render the summarization preamble with the fallback string substituted.
pub fn summarize_preamble() -> String {
    SUMMARIZE_PREAMBLE.replace("NO_SOLUTION_FALLBACK", NO_SOLUTION_FALLBACK)
}
