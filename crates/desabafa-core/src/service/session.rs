//! Session service: quota-gated creation, listing, transcript, manual append.

use desabafa_types::chat::{ChatMessage, ChatSession, NewChatMessage, Sender, SessionTranscript};
use desabafa_types::error::{RepositoryError, ServiceError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::persona::PersonaRegistry;
use crate::quota;
use crate::repository::chat::ChatRepository;
use crate::repository::user::UserRepository;

/// Longest accepted message body, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

const MAX_SESSION_TYPE_CHARS: usize = 50;

/// Request to open a session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: Uuid,
    pub session_type: String,
    /// Persona key; unknown or missing keys use the default persona.
    pub persona: Option<String>,
    pub is_premium: bool,
}

/// Trim a message body and check it is non-empty and within bounds.
pub fn validate_message(text: &str) -> Result<&str, ServiceError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ServiceError::Validation("message cannot be empty".to_string()));
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ServiceError::Validation(format!(
            "message exceeds {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(text)
}

/// Map an append failure: `Conflict` means the session has ended.
pub(crate) fn append_error(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::NotFound("session".to_string()),
        RepositoryError::Conflict(_) => ServiceError::Conflict("session has ended".to_string()),
        other => other.into(),
    }
}

pub struct SessionService<U: UserRepository, C: ChatRepository> {
    users: U,
    chats: C,
}

impl<U: UserRepository, C: ChatRepository> SessionService<U, C> {
    pub fn new(users: U, chats: C) -> Self {
        Self { users, chats }
    }

    /// Open a session, subject to the quota policy.
    ///
    /// The eligibility check here only fails fast; the authoritative check
    /// and the debit happen atomically inside `ChatRepository::create_session`.
    #[tracing::instrument(
        name = "create_session",
        skip(self, request),
        fields(user_id = %request.user_id, is_premium = request.is_premium)
    )]
    pub async fn create_session(&self, request: NewSession) -> Result<ChatSession, ServiceError> {
        let session_type = request.session_type.trim();
        if session_type.is_empty() {
            return Err(ServiceError::Validation("session_type is required".to_string()));
        }
        if session_type.chars().count() > MAX_SESSION_TYPE_CHARS {
            return Err(ServiceError::Validation(format!(
                "session_type exceeds {MAX_SESSION_TYPE_CHARS} characters"
            )));
        }

        let user = self
            .users
            .get_user(&request.user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("user".to_string()))?;

        if !quota::can_start(&user) {
            return Err(ServiceError::QuotaExceeded);
        }

        let requested = request.persona.as_deref().unwrap_or_default();
        let persona = PersonaRegistry::global().resolve(requested);
        if !requested.is_empty() && persona.id != requested.trim() {
            warn!(requested, fallback = persona.id, "Unknown persona, using default");
        }

        let session = ChatSession::new(
            user.id,
            session_type.to_string(),
            persona.id.to_string(),
            request.is_premium,
        );

        let session = self
            .chats
            .create_session(&session)
            .await
            .map_err(ServiceError::from_repo("user"))?;

        info!(
            session_id = %session.id,
            persona = %session.persona,
            is_premium = session.is_premium,
            "Session created"
        );
        Ok(session)
    }

    /// A user's sessions, newest first.
    pub async fn list_sessions(&self, user_id: &Uuid) -> Result<Vec<ChatSession>, ServiceError> {
        if self.users.get_user(user_id).await?.is_none() {
            return Err(ServiceError::NotFound("user".to_string()));
        }
        Ok(self.chats.list_sessions(user_id).await?)
    }

    pub async fn get_session(&self, session_id: &Uuid) -> Result<ChatSession, ServiceError> {
        self.chats
            .get_session(session_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("session".to_string()))
    }

    /// Session plus its full transcript, oldest message first.
    pub async fn get_transcript(
        &self,
        session_id: &Uuid,
    ) -> Result<SessionTranscript, ServiceError> {
        let session = self.get_session(session_id).await?;
        let messages = self.chats.get_messages(session_id).await?;
        Ok(SessionTranscript { session, messages })
    }

    /// Append a manual or system-originated message. Ended sessions reject
    /// new messages with `ServiceError::Conflict`.
    #[tracing::instrument(name = "append_message", skip(self, text), fields(session_id = %session_id))]
    pub async fn append_message(
        &self,
        session_id: &Uuid,
        sender: Sender,
        text: &str,
        tokens_used: u32,
    ) -> Result<ChatMessage, ServiceError> {
        let text = validate_message(text)?;
        let mut stored = self
            .chats
            .append_messages(session_id, &[NewChatMessage::text(sender, text, tokens_used)])
            .await
            .map_err(append_error)?;

        stored
            .pop()
            .ok_or_else(|| ServiceError::Storage("append returned no message".to_string()))
    }

    /// Close a session. Idempotent.
    #[tracing::instrument(name = "end_session", skip(self))]
    pub async fn end_session(&self, session_id: &Uuid) -> Result<ChatSession, ServiceError> {
        let session = self
            .chats
            .end_session(session_id)
            .await
            .map_err(ServiceError::from_repo("session"))?;
        info!(session_id = %session.id, "Session ended");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desabafa_types::chat::SessionStatus;
    use desabafa_types::user::User;

    use crate::testing::MemoryStore;

    fn seed_user(store: &MemoryStore, free: u32, subscribed: bool) -> User {
        let mut user = User::new(format!("{}@example.com", Uuid::now_v7()), None, false, free);
        user.subscription_active = subscribed;
        store.put_user(user.clone());
        user
    }

    fn request(user_id: Uuid, is_premium: bool) -> NewSession {
        NewSession {
            user_id,
            session_type: "estresse".to_string(),
            persona: Some("coach".to_string()),
            is_premium,
        }
    }

    #[tokio::test]
    async fn test_non_premium_session_debits_exactly_one() {
        let store = MemoryStore::default();
        let svc = SessionService::new(store.clone(), store.clone());
        let user = seed_user(&store, 3, false);

        let session = svc.create_session(request(user.id, false)).await.unwrap();
        assert_eq!(session.persona, "coach");
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(store.user(&user.id).free_sessions_remaining, 2);
    }

    #[tokio::test]
    async fn test_exhausted_quota_rejected_and_counter_stays_zero() {
        let store = MemoryStore::default();
        let svc = SessionService::new(store.clone(), store.clone());
        let user = seed_user(&store, 0, false);

        let err = svc.create_session(request(user.id, false)).await.unwrap_err();
        assert!(matches!(err, ServiceError::QuotaExceeded));
        assert_eq!(store.user(&user.id).free_sessions_remaining, 0);
        assert!(svc.list_sessions(&user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscriber_bypasses_quota() {
        let store = MemoryStore::default();
        let svc = SessionService::new(store.clone(), store.clone());
        let user = seed_user(&store, 0, true);

        svc.create_session(request(user.id, false)).await.unwrap();
        assert_eq!(store.user(&user.id).free_sessions_remaining, 0);
    }

    #[tokio::test]
    async fn test_premium_flag_does_not_consume_quota() {
        let store = MemoryStore::default();
        let svc = SessionService::new(store.clone(), store.clone());
        let user = seed_user(&store, 2, false);

        svc.create_session(request(user.id, true)).await.unwrap();
        assert_eq!(store.user(&user.id).free_sessions_remaining, 2);
    }

    #[tokio::test]
    async fn test_concurrent_creates_only_one_wins_last_free_session() {
        let store = MemoryStore::default();
        let svc = std::sync::Arc::new(SessionService::new(store.clone(), store.clone()));
        let user_id = seed_user(&store, 1, false).id;

        let a = tokio::spawn({
            let svc = svc.clone();
            async move { svc.create_session(request(user_id, false)).await }
        });
        let b = tokio::spawn({
            let svc = svc.clone();
            async move { svc.create_session(request(user_id, false)).await }
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(ServiceError::QuotaExceeded))));
        assert_eq!(store.user(&user_id).free_sessions_remaining, 0);
    }

    #[tokio::test]
    async fn test_unknown_persona_falls_back_to_default() {
        let store = MemoryStore::default();
        let svc = SessionService::new(store.clone(), store.clone());
        let user = seed_user(&store, 3, false);

        let mut req = request(user.id, false);
        req.persona = Some("astrologo".to_string());
        let session = svc.create_session(req).await.unwrap();
        assert_eq!(session.persona, "psicologo");
    }

    #[tokio::test]
    async fn test_create_session_validation_and_missing_user() {
        let store = MemoryStore::default();
        let svc = SessionService::new(store.clone(), store.clone());

        let mut req = request(Uuid::now_v7(), false);
        assert!(matches!(
            svc.create_session(req.clone()).await,
            Err(ServiceError::NotFound(_))
        ));
        req.session_type = "   ".to_string();
        assert!(matches!(
            svc.create_session(req).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_append_and_transcript_order() {
        let store = MemoryStore::default();
        let svc = SessionService::new(store.clone(), store.clone());
        let user = seed_user(&store, 3, false);
        let session = svc.create_session(request(user.id, false)).await.unwrap();

        for i in 0..3 {
            svc.append_message(&session.id, Sender::User, &format!("m{i}"), 0)
                .await
                .unwrap();
        }
        let transcript = svc.get_transcript(&session.id).await.unwrap();
        let contents: Vec<_> = transcript.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["m0", "m1", "m2"]);
        assert!(transcript
            .messages
            .windows(2)
            .all(|w| w[0].created_at < w[1].created_at));
    }

    #[tokio::test]
    async fn test_ended_session_rejects_messages() {
        let store = MemoryStore::default();
        let svc = SessionService::new(store.clone(), store.clone());
        let user = seed_user(&store, 3, false);
        let session = svc.create_session(request(user.id, false)).await.unwrap();

        let ended = svc.end_session(&session.id).await.unwrap();
        assert_eq!(ended.status, SessionStatus::Ended);
        assert!(ended.ended_at.is_some());

        // Ending again is a no-op.
        let again = svc.end_session(&session.id).await.unwrap();
        assert_eq!(again.ended_at, ended.ended_at);

        let err = svc
            .append_message(&session.id, Sender::User, "ainda aí?", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_append_rejects_empty_text() {
        let store = MemoryStore::default();
        let svc = SessionService::new(store.clone(), store.clone());
        let err = svc
            .append_message(&Uuid::now_v7(), Sender::User, "  ", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
