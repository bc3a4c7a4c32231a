//! Conversation state
//!
//! The conversation is the single source of truth for what the chat pane
//! renders. It only ever grows: turns are appended at the end and never
//! edited, removed or reordered.

use serde::{Deserialize, Serialize};

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    sender: Sender,
    text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Append-only log of turns for the current session
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
    revision: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        tracing::debug!(sender = ?turn.sender, len = turn.text.len(), "appending turn");
        self.turns.push(turn);
        self.revision += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Bumped on every append. Observers compare against the value they saw
    /// last to find out whether the log grew.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
