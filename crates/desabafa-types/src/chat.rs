//! Chat session and message types for Desabafa.
//!
//! A session belongs to one user and talks to one persona. Messages are
//! ordered by their server-assigned `created_at` within the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::speech::Voice;

/// Lifecycle status of a chat session.
///
/// `active -> ended` is the only transition and `ended` is terminal.
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('active', 'ended'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Ended,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Ended => write!(f, "ended"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SessionStatus::Active),
            "ended" => Ok(SessionStatus::Ended),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Ai => write!(f, "ai"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "ai" => Ok(Sender::Ai),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// How a message entered the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Audio,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Text => write!(f, "text"),
            MessageKind::Audio => write!(f, "audio"),
        }
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(MessageKind::Text),
            "audio" => Ok(MessageKind::Audio),
            other => Err(format!("invalid message kind: '{other}'")),
        }
    }
}

/// A conversation between one user and one persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Free-form category chosen by the client (e.g. "estresse", "carreira").
    pub session_type: String,
    /// Persona key. Always a registered persona once persisted.
    pub persona: String,
    pub status: SessionStatus,
    pub is_premium: bool,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl ChatSession {
    pub fn new(user_id: Uuid, session_type: String, persona: String, is_premium: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            session_type,
            persona,
            status: SessionStatus::Active,
            is_premium,
            summary: None,
            created_at: now,
            updated_at: now,
            ended_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}

/// A single persisted message.
///
/// Immutable once written, except `audio_url` and `voice` which are filled in
/// when synthesis completes after the text reply is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sender: Sender,
    pub content: String,
    pub kind: MessageKind,
    pub audio_url: Option<String>,
    pub voice: Option<Voice>,
    pub tokens_used: u32,
    pub created_at: DateTime<Utc>,
}

/// A message about to be appended. The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub sender: Sender,
    pub content: String,
    pub kind: MessageKind,
    pub tokens_used: u32,
}

impl NewChatMessage {
    pub fn text(sender: Sender, content: impl Into<String>, tokens_used: u32) -> Self {
        Self {
            sender,
            content: content.into(),
            kind: MessageKind::Text,
            tokens_used,
        }
    }

    pub fn transcribed(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
            kind: MessageKind::Audio,
            tokens_used: 0,
        }
    }
}

/// A session together with its ordered transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTranscript {
    #[serde(flatten)]
    pub session: ChatSession,
    pub messages: Vec<ChatMessage>,
}

/// Result of a reply-generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// The persisted assistant reply.
    pub message: ChatMessage,
    /// The incoming user text, when the caller asked for it to be recorded.
    pub user_message: Option<ChatMessage>,
    pub persona: String,
}

/// Result of a summary-generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub summary: String,
    pub generated_at: DateTime<Utc>,
}
