//! Chat session state — the ordered, append-only conversation log.
//!
//! A `ChatSession` is owned by the caller and passed explicitly into the
//! chat responder; nothing here is process-global. The log lives only in
//! memory and is lost on restart.
//!
//! Shape invariants (maintained by `chat::respond`, checked in tests):
//! - at most one `System` turn, always at index 0
//! - no two consecutive turns share a role
//! - every `User` turn is followed by exactly one `Assistant` turn

use serde::{Deserialize, Serialize};

/// Role tag of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message. Serializes to the `{"role": ..., "content": ...}`
/// wire shape chat-completion endpoints expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

/// Ordered, append-only sequence of turns. Created empty at session start,
/// grows monotonically, never truncated or persisted.
#[derive(Debug, Default)]
pub struct ChatSession {
    turns: Vec<Turn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn has_system(&self) -> bool {
        self.turns.iter().any(|t| t.role == Role::System)
    }

    /// Insert the system turn at index 0 unless one is already present.
    /// Returns `true` if the turn was inserted.
    pub fn prime_system(&mut self, content: &str) -> bool {
        if self.has_system() {
            return false;
        }
        self.turns.insert(0, Turn::new(Role::System, content));
        true
    }

    pub fn push_user(&mut self, content: &str) {
        self.turns.push(Turn::new(Role::User, content));
    }

    pub fn push_assistant(&mut self, content: &str) {
        self.turns.push(Turn::new(Role::Assistant, content));
    }

    /// Remove the trailing user turn, if the log ends with one.
    /// Used to roll back after a failed completion call so a retry appends
    /// cleanly instead of stacking two consecutive user turns.
    /// Returns `true` if a turn was removed.
    pub fn rollback_user(&mut self) -> bool {
        if self.turns.last().map(|t| t.role) == Some(Role::User) {
            self.turns.pop();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let s = ChatSession::new();
        assert!(s.is_empty());
        assert!(!s.has_system());
    }

    #[test]
    fn prime_system_inserts_once_at_front() {
        let mut s = ChatSession::new();
        s.push_user("hello");
        assert!(s.prime_system("be helpful"));
        assert!(!s.prime_system("be helpful again"));

        assert_eq!(s.len(), 2);
        assert_eq!(s.turns()[0].role, Role::System);
        assert_eq!(s.turns()[0].content, "be helpful");
    }

    #[test]
    fn rollback_removes_only_trailing_user_turn() {
        let mut s = ChatSession::new();
        s.push_user("question");
        assert!(s.rollback_user());
        assert!(s.is_empty());

        s.push_user("question");
        s.push_assistant("answer");
        assert!(!s.rollback_user());
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn turn_serializes_to_wire_shape() {
        let t = Turn::new(Role::Assistant, "hi");
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
