//! ChatRepository trait definition.
//!
//! Provides persistence for chat sessions and their messages, including the
//! quota-guarded session insert. Follows the same RPITIT pattern as
//! UserRepository.

use desabafa_types::chat::{ChatMessage, ChatSession, NewChatMessage};
use desabafa_types::error::RepositoryError;
use desabafa_types::speech::Voice;
use uuid::Uuid;

/// Repository trait for chat session and message persistence.
///
/// Implementations live in desabafa-infra (e.g., `SqliteChatRepository`).
pub trait ChatRepository: Send + Sync {
    /// Authorize and insert a session in one atomic step.
    ///
    /// The owning user's row is read inside the same write transaction as the
    /// insert, and `quota::charge_for(subscription_active, session.is_premium)`
    /// is applied to it:
    /// - `QuotaCharge::DebitFreeSession` decrements `free_sessions_remaining`
    ///   only if it is positive.
    /// - `QuotaCharge::NoCharge` only requires the user to be eligible
    ///   (active subscription or a positive counter).
    ///
    /// If the guard fails nothing is written and `RepositoryError::QuotaExhausted`
    /// is returned. A missing user yields `RepositoryError::NotFound`.
    fn create_session(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<ChatSession, RepositoryError>> + Send;

    fn get_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// List a user's sessions, newest first.
    fn list_sessions(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSession>, RepositoryError>> + Send;

    /// Move a session to `ended`. Ending an already-ended session returns it
    /// unchanged.
    fn end_session(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<ChatSession, RepositoryError>> + Send;

    /// Append messages to an active session in one transaction.
    ///
    /// The store assigns ids and strictly increasing `created_at` values and
    /// stamps the session's `updated_at`. Returns `RepositoryError::Conflict`
    /// if the session has ended and `RepositoryError::NotFound` if it does
    /// not exist.
    fn append_messages(
        &self,
        session_id: &Uuid,
        messages: &[NewChatMessage],
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Full transcript, oldest first.
    fn get_messages(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// The `limit` most recent messages, oldest first.
    fn get_recent_messages(
        &self,
        session_id: &Uuid,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Attach synthesized audio to an existing message.
    fn set_message_audio(
        &self,
        message_id: &Uuid,
        audio_url: &str,
        voice: Voice,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Replace the session summary (last write wins).
    fn set_summary(
        &self,
        session_id: &Uuid,
        summary: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn count_sessions(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Total messages across all of a user's sessions.
    fn count_messages(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
