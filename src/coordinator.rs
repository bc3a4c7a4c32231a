//! Request lifecycle
//!
//! The coordinator owns the send → await → append cycle for user queries.
//! It never performs I/O itself: `submit` appends the user turn and hands
//! back a [`PendingRequest`] for the runtime to send, and `complete` folds
//! the outcome back into the conversation. [`Session`] wires the two halves
//! together for callers that can simply await the round trip.

use anyhow::Result;

use crate::client::ChatBackend;
use crate::state::{Conversation, Turn};

/// Text of the bot turn appended when a request fails for any reason.
pub const FETCH_ERROR_TEXT: &str = "Error fetching response.";

/// Monotonic identifier of an issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// A request the runtime must send to the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: RequestId,
    pub query: String,
}

#[derive(Debug, Default)]
pub struct Coordinator {
    pending: bool,
    next_id: u64,
    latest: Option<RequestId>,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn latest(&self) -> Option<RequestId> {
        self.latest
    }

    /// Start a cycle for `raw_text`.
    ///
    /// Blank input is ignored and returns `None`. Otherwise the user turn is
    /// appended with the text exactly as typed, before any request exists.
    /// A second submit while pending is not refused here; the input surface
    /// is what keeps the user from doing that.
    pub fn submit(&mut self, conversation: &mut Conversation, raw_text: &str) -> Option<PendingRequest> {
        if raw_text.trim().is_empty() {
            return None;
        }

        self.pending = true;
        conversation.append(Turn::user(raw_text));

        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.latest = Some(id);

        tracing::info!(request = id.get(), "submitting query");

        Some(PendingRequest {
            id,
            query: raw_text.to_string(),
        })
    }

    /// Finish the cycle for request `id`.
    ///
    /// Every completion appends exactly one bot turn, stale or not. Only the
    /// latest issued request clears the pending flag.
    pub fn complete(&mut self, conversation: &mut Conversation, id: RequestId, outcome: Result<String>) {
        match outcome {
            Ok(text) => {
                tracing::info!(request = id.get(), "received response");
                conversation.append(Turn::bot(text));
            }
            Err(err) => {
                tracing::warn!(request = id.get(), error = %format!("{err:#}"), "chat request failed");
                conversation.append(Turn::bot(FETCH_ERROR_TEXT));
            }
        }

        if self.latest == Some(id) {
            self.pending = false;
        } else {
            tracing::debug!(request = id.get(), "stale response appended");
        }
    }
}

/// A conversation driven end to end against a backend.
pub struct Session<B> {
    backend: B,
    conversation: Conversation,
    coordinator: Coordinator,
}

impl<B: ChatBackend> Session<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            conversation: Conversation::new(),
            coordinator: Coordinator::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn is_pending(&self) -> bool {
        self.coordinator.is_pending()
    }

    /// Run one full cycle. Returns `false` if the input was blank.
    pub async fn submit(&mut self, raw_text: &str) -> bool {
        let Some(request) = self.coordinator.submit(&mut self.conversation, raw_text) else {
            return false;
        };

        let outcome = self.backend.send(&request.query).await;
        self.coordinator.complete(&mut self.conversation, request.id, outcome);
        true
    }
}
