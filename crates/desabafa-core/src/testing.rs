//! In-memory fakes for the core traits, shared by service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use desabafa_types::chat::{ChatMessage, ChatSession, NewChatMessage, SessionStatus};
use desabafa_types::error::{RepositoryError, StorageError};
use desabafa_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};
use desabafa_types::speech::{SpeechError, SpeechRequest, TranscriptionRequest, Voice};
use desabafa_types::user::{SubscriptionUpdate, User};
use uuid::Uuid;

use crate::auth::PasswordHasher;
use crate::llm::provider::LlmProvider;
use crate::quota::{self, QuotaCharge};
use crate::repository::chat::ChatRepository;
use crate::repository::user::UserRepository;
use crate::speech::provider::SpeechProvider;
use crate::storage::audio::AudioStore;

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    sessions: HashMap<Uuid, ChatSession>,
    messages: Vec<ChatMessage>,
}

/// Users, sessions, and messages behind one lock, so every operation is
/// atomic like a single write transaction.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn put_user(&self, user: User) {
        self.state.lock().unwrap().users.insert(user.id, user);
    }

    pub fn user(&self, id: &Uuid) -> User {
        self.state.lock().unwrap().users[id].clone()
    }

    pub fn session(&self, id: &Uuid) -> ChatSession {
        self.state.lock().unwrap().sessions[id].clone()
    }
}

impl UserRepository for MemoryStore {
    async fn create_user(&self, user: &User) -> Result<User, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(format!("email '{}'", user.email)));
        }
        state.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn get_user(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.state.lock().unwrap().users.get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn record_login(&self, id: &Uuid, at: DateTime<Utc>) -> Result<User, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let user = state.users.get_mut(id).ok_or(RepositoryError::NotFound)?;
        user.last_login = Some(at);
        Ok(user.clone())
    }

    async fn update_subscription(
        &self,
        id: &Uuid,
        update: &SubscriptionUpdate,
    ) -> Result<User, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let user = state.users.get_mut(id).ok_or(RepositoryError::NotFound)?;
        user.subscription_plan = update.plan;
        user.subscription_active = update.active;
        if update.expires_at.is_some() {
            user.subscription_expires_at = update.expires_at;
        }
        Ok(user.clone())
    }
}

impl ChatRepository for MemoryStore {
    async fn create_session(
        &self,
        session: &ChatSession,
    ) -> Result<ChatSession, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .get_mut(&session.user_id)
            .ok_or(RepositoryError::NotFound)?;
        let allowed = match quota::charge_for(user.subscription_active, session.is_premium) {
            QuotaCharge::DebitFreeSession => quota::debit_free_session(user),
            QuotaCharge::NoCharge => quota::can_start(user),
        };
        if !allowed {
            return Err(RepositoryError::QuotaExhausted);
        }
        state.sessions.insert(session.id, session.clone());
        Ok(session.clone())
    }

    async fn get_session(&self, session_id: &Uuid) -> Result<Option<ChatSession>, RepositoryError> {
        Ok(self.state.lock().unwrap().sessions.get(session_id).cloned())
    }

    async fn list_sessions(&self, user_id: &Uuid) -> Result<Vec<ChatSession>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let mut sessions: Vec<_> = state
            .sessions
            .values()
            .filter(|s| s.user_id == *user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn end_session(&self, session_id: &Uuid) -> Result<ChatSession, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let session = state
            .sessions
            .get_mut(session_id)
            .ok_or(RepositoryError::NotFound)?;
        if session.is_active() {
            let now = Utc::now();
            session.status = SessionStatus::Ended;
            session.ended_at = Some(now);
            session.updated_at = now;
        }
        Ok(session.clone())
    }

    async fn append_messages(
        &self,
        session_id: &Uuid,
        messages: &[NewChatMessage],
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let session = state
            .sessions
            .get(session_id)
            .ok_or(RepositoryError::NotFound)?;
        if !session.is_active() {
            return Err(RepositoryError::Conflict("session has ended".to_string()));
        }

        let mut last = state
            .messages
            .iter()
            .filter(|m| m.session_id == *session_id)
            .map(|m| m.created_at)
            .max();
        let mut stored = Vec::with_capacity(messages.len());
        for new in messages {
            let now = Utc::now();
            let created_at = match last {
                Some(prev) if prev >= now => prev + chrono::Duration::microseconds(1),
                _ => now,
            };
            last = Some(created_at);
            stored.push(ChatMessage {
                id: Uuid::now_v7(),
                session_id: *session_id,
                sender: new.sender,
                content: new.content.clone(),
                kind: new.kind,
                audio_url: None,
                voice: None,
                tokens_used: new.tokens_used,
                created_at,
            });
        }

        if let Some(session) = state.sessions.get_mut(session_id) {
            session.updated_at = Utc::now();
        }
        state.messages.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn get_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .messages
            .iter()
            .filter(|m| m.session_id == *session_id)
            .cloned()
            .collect())
    }

    async fn get_recent_messages(
        &self,
        session_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let all = self.get_messages(session_id).await?;
        let start = all.len().saturating_sub(limit as usize);
        Ok(all[start..].to_vec())
    }

    async fn set_message_audio(
        &self,
        message_id: &Uuid,
        audio_url: &str,
        voice: Voice,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let message = state
            .messages
            .iter_mut()
            .find(|m| m.id == *message_id)
            .ok_or(RepositoryError::NotFound)?;
        message.audio_url = Some(audio_url.to_string());
        message.voice = Some(voice);
        Ok(())
    }

    async fn set_summary(&self, session_id: &Uuid, summary: &str) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let session = state
            .sessions
            .get_mut(session_id)
            .ok_or(RepositoryError::NotFound)?;
        session.summary = Some(summary.to_string());
        Ok(())
    }

    async fn count_sessions(&self, user_id: &Uuid) -> Result<u64, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.sessions.values().filter(|s| s.user_id == *user_id).count() as u64)
    }

    async fn count_messages(&self, user_id: &Uuid) -> Result<u64, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .messages
            .iter()
            .filter(|m| {
                state
                    .sessions
                    .get(&m.session_id)
                    .is_some_and(|s| s.user_id == *user_id)
            })
            .count() as u64)
    }
}

#[derive(Clone, Default)]
pub struct MemoryAudioStore {
    blobs: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryAudioStore {
    pub fn len(&self) -> usize {
        self.blobs.len()
    }
}

impl AudioStore for MemoryAudioStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        self.blobs.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.blobs
            .get(key)
            .map(|b| b.value().clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}

struct MockLlmState {
    reply: String,
    error: Option<fn() -> LlmError>,
    delay: Option<Duration>,
    requests: Vec<CompletionRequest>,
}

/// Scriptable generation provider that records every request.
#[derive(Clone)]
pub struct MockLlm {
    state: Arc<Mutex<MockLlmState>>,
}

impl MockLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockLlmState {
                reply: reply.to_string(),
                error: None,
                delay: None,
                requests: Vec::new(),
            })),
        }
    }

    pub fn set_reply(&self, reply: &str) {
        self.state.lock().unwrap().reply = reply.to_string();
    }

    pub fn fail_with(&self, error: fn() -> LlmError) {
        self.state.lock().unwrap().error = Some(error);
    }

    pub fn delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }
}

impl LlmProvider for MockLlm {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let (reply, error, delay) = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request.clone());
            (state.reply.clone(), state.error, state.delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = error {
            return Err(error());
        }

        Ok(CompletionResponse {
            id: "mock-1".to_string(),
            content: reply,
            model: request.model.clone(),
            stop_reason: StopReason::EndTurn,
            usage: Usage {
                input_tokens: 20,
                output_tokens: 10,
            },
        })
    }
}

#[derive(Default)]
struct MockSpeechState {
    fail_synthesis: bool,
    fail_transcription: bool,
    voices: Vec<Voice>,
}

#[derive(Clone, Default)]
pub struct MockSpeech {
    state: Arc<Mutex<MockSpeechState>>,
}

impl MockSpeech {
    pub fn fail_synthesis(&self) {
        self.state.lock().unwrap().fail_synthesis = true;
    }

    pub fn fail_transcription(&self) {
        self.state.lock().unwrap().fail_transcription = true;
    }

    pub fn synthesized_voices(&self) -> Vec<Voice> {
        self.state.lock().unwrap().voices.clone()
    }
}

impl SpeechProvider for MockSpeech {
    fn name(&self) -> &str {
        "mock"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, SpeechError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_synthesis {
            return Err(SpeechError::Provider {
                message: "synthesis unavailable".to_string(),
            });
        }
        state.voices.push(request.voice);
        Ok(b"ID3-fake-mp3".to_vec())
    }

    async fn transcribe(&self, _request: &TranscriptionRequest) -> Result<String, SpeechError> {
        if self.state.lock().unwrap().fail_transcription {
            return Err(SpeechError::Provider {
                message: "transcription unavailable".to_string(),
            });
        }
        Ok("texto transcrito".to_string())
    }
}

/// Reversible "hash" so tests skip the Argon2 cost.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, String> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain$") == Some(password)
    }
}
