//! Conversation state for one interactive session.

use chrono::{Local, NaiveDateTime};
use uuid::Uuid;

/// Speaker of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Human,
    Assistant,
}

impl Role {
    /// Wire token understood by the backend's history converter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Human => "human",
            Role::Assistant => "ai",
        }
    }
}

/// One utterance in a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// A completed exchange as shown to the operator: the original prompt and
/// the answer with its citation block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayExchange {
    pub prompt: String,
    pub answer: String,
}

/// Holds the ordered turn history for one session.
///
/// Turns grow strictly in pairs (human then assistant) per completed
/// exchange, and the display sequence stays in lockstep with the pair count.
/// The raw assistant turn is what future queries send back as context; the
/// display exchange carries the formatted answer the operator saw.
pub struct ConversationSession {
    id: Uuid,
    started_at: NaiveDateTime,
    turns: Vec<Turn>,
    exchanges: Vec<DisplayExchange>,
}

impl ConversationSession {
    /// Start a fresh session with empty history.
    pub fn new() -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Local::now().naive_local(),
            turns: Vec::new(),
            exchanges: Vec::new(),
        };
        tracing::debug!(session_id = %session.id, "Conversation session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    /// Record one completed exchange: a human turn plus the raw assistant
    /// turn in history, and the formatted answer in the display sequence.
    /// Both sequences grow together or not at all.
    pub fn append_exchange(&mut self, prompt: &str, display_answer: &str, raw_answer: &str) {
        self.turns.push(Turn {
            role: Role::Human,
            content: prompt.to_string(),
        });
        self.turns.push(Turn {
            role: Role::Assistant,
            content: raw_answer.to_string(),
        });
        self.exchanges.push(DisplayExchange {
            prompt: prompt.to_string(),
            answer: display_answer.to_string(),
        });
    }

    /// History projected as (role, content) pairs for transmission.
    pub fn history_pairs(&self) -> Vec<(String, String)> {
        self.turns
            .iter()
            .map(|t| (t.role.as_str().to_string(), t.content.clone()))
            .collect()
    }

    /// Completed exchanges, oldest first.
    pub fn exchanges(&self) -> &[DisplayExchange] {
        &self.exchanges
    }

    /// Full turn sequence, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn exchange_count(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Discard everything and start over under a fresh identity. The only
    /// operation that truncates history.
    pub fn reset(&mut self) {
        tracing::debug!(
            session_id = %self.id,
            exchanges = self.exchanges.len(),
            "Conversation session reset"
        );
        *self = Self::new();
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_empty() {
        let session = ConversationSession::new();
        assert!(session.is_empty());
        assert!(session.exchanges().is_empty());
        assert_eq!(session.exchange_count(), 0);
    }

    #[test]
    fn append_grows_both_sequences_in_lockstep() {
        let mut session = ConversationSession::new();
        session.append_exchange(
            "What is X?",
            "X is Y.\n\nsources:\n1. docs/x.html\n",
            "X is Y.",
        );

        assert_eq!(session.turns().len(), 2);
        assert_eq!(session.exchange_count(), 1);

        session.append_exchange("And Z?", "Z is W.\n\n", "Z is W.");
        assert_eq!(session.turns().len(), 4);
        assert_eq!(session.exchange_count(), 2);
    }

    #[test]
    fn turns_alternate_starting_with_human() {
        let mut session = ConversationSession::new();
        session.append_exchange("one", "one out", "one raw");
        session.append_exchange("two", "two out", "two raw");

        let roles: Vec<Role> = session.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![Role::Human, Role::Assistant, Role::Human, Role::Assistant]
        );
    }

    #[test]
    fn history_pairs_use_wire_role_tokens() {
        let mut session = ConversationSession::new();
        session.append_exchange("What is X?", "display", "X is Y.");

        let pairs = session.history_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("human".to_string(), "What is X?".to_string()));
        assert_eq!(pairs[1], ("ai".to_string(), "X is Y.".to_string()));
    }

    #[test]
    fn history_carries_raw_answer_not_display_text() {
        let mut session = ConversationSession::new();
        session.append_exchange("q", "answer\n\nsources:\n1. docs/a.html\n", "answer");

        let pairs = session.history_pairs();
        assert_eq!(pairs[1].1, "answer");
        assert!(!pairs[1].1.contains("sources:"));
    }

    #[test]
    fn exchanges_keep_submission_order() {
        let mut session = ConversationSession::new();
        session.append_exchange("first", "first answer", "first raw");
        session.append_exchange("second", "second answer", "second raw");

        let prompts: Vec<&str> = session
            .exchanges()
            .iter()
            .map(|e| e.prompt.as_str())
            .collect();
        assert_eq!(prompts, vec!["first", "second"]);
    }

    #[test]
    fn reset_discards_history_under_fresh_identity() {
        let mut session = ConversationSession::new();
        let old_id = session.id();
        session.append_exchange("q", "a", "a");

        session.reset();
        assert!(session.is_empty());
        assert!(session.exchanges().is_empty());
        assert_ne!(session.id(), old_id);
    }

    #[test]
    fn role_tokens_match_backend_contract() {
        assert_eq!(Role::Human.as_str(), "human");
        assert_eq!(Role::Assistant.as_str(), "ai");
    }
}
