//! Transcript and session types shared across the Parley crates.
//!
//! A `ChatSession` is created once per process run and threaded explicitly
//! through the turn controller; there is no ambient global holding chat
//! state. The transcript is append-only for the lifetime of the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Messages
// =============================================================================

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A message typed or spoken by the user.
    Human,
    /// A message produced by the remote model.
    Ai,
}

/// A single chat message: who said it and what was said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a human message.
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    /// Create an AI message.
    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
        }
    }

    /// Whether this message was produced by the model.
    pub fn is_ai(&self) -> bool {
        self.role == Role::Ai
    }
}

// =============================================================================
// Transcript
// =============================================================================

/// Ordered, append-only sequence of messages for one session.
///
/// Invariant: messages alternate Human/AI, except possibly a trailing
/// unanswered Human message while a reply is pending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the end of the transcript.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages in the transcript.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// All messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True when the last entry is an unanswered Human message.
    pub fn awaiting_reply(&self) -> bool {
        matches!(
            self.last(),
            Some(Message {
                role: Role::Human,
                ..
            })
        )
    }

    /// The turn state implied by the transcript tail.
    pub fn turn_state(&self) -> TurnState {
        if self.awaiting_reply() {
            TurnState::AwaitingAiResponse
        } else {
            TurnState::AwaitingUserInput
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Per-run chat session: identity, model, and the owned transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub model_name: String,
    pub started_at: DateTime<Utc>,
    pub transcript: Transcript,
}

impl ChatSession {
    /// Create a session with a fresh session id.
    ///
    /// The transcript is seeded with one AI greeting so that it is never
    /// empty and always ends on an AI message when idle.
    pub fn new(user_id: Uuid, model_name: impl Into<String>) -> Self {
        let model_name = model_name.into();
        let mut transcript = Transcript::new();
        transcript.push(Message::ai(format!(
            "Hello! I am {}. How can I help you today?",
            model_name
        )));

        Self {
            session_id: Uuid::new_v4(),
            user_id,
            model_name,
            started_at: Utc::now(),
            transcript,
        }
    }
}

// =============================================================================
// Turn state
// =============================================================================

/// The two states of the per-turn cycle.
///
/// A cycle transitions to `AwaitingAiResponse` when a Human message is
/// appended, and back to `AwaitingUserInput` once an AI message answers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// The transcript ends on an AI message (or is empty); idle.
    AwaitingUserInput,
    /// The transcript ends on an unanswered Human message.
    AwaitingAiResponse,
}

/// The result of one controller cycle.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// Turn state after the cycle completed.
    pub state: TurnState,
    /// The aggregated AI reply, if one was appended this cycle.
    pub reply: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================
