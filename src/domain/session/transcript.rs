use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::llm::{Message, MessageRole};

/// One transcript line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    #[serde(flatten)]
    pub message: Message,
    pub at: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn role(&self) -> MessageRole {
        self.message.role
    }

    pub fn content(&self) -> &str {
        &self.message.content
    }
}

/// Append-only record of what was asked and answered in a session.
///
/// Display only; never fed back into prompts.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    fn push(&mut self, message: Message) {
        self.entries.push(TranscriptEntry {
            message,
            at: Utc::now(),
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push_user("Q1");
        transcript.push_assistant("A1");
        transcript.push_user("Q2");

        let roles: Vec<MessageRole> = transcript.entries().iter().map(|e| e.role()).collect();
        assert_eq!(
            roles,
            vec![MessageRole::User, MessageRole::Assistant, MessageRole::User]
        );
        assert_eq!(transcript.entries()[2].content(), "Q2");
    }

    #[test]
    fn test_serializes_as_flat_list() {
        let mut transcript = Transcript::new();
        transcript.push_user("Hello");

        let json = serde_json::to_value(&transcript).unwrap();

        assert_eq!(json[0]["role"], "user");
        assert_eq!(json[0]["content"], "Hello");
        assert!(json[0]["at"].is_string());
    }
}
