//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `desabafa-core` using sqlx with split
//! read/write pools. Quota-guarded session inserts and message appends run
//! as single write transactions on the writer pool.

use chrono::{DateTime, SubsecRound, Utc};
use desabafa_core::quota::{self, QuotaCharge};
use desabafa_core::repository::chat::ChatRepository;
use desabafa_types::chat::{
    ChatMessage, ChatSession, MessageKind, NewChatMessage, Sender, SessionStatus,
};
use desabafa_types::error::RepositoryError;
use desabafa_types::speech::Voice;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

/// SQLite-backed implementation of `ChatRepository`.
#[derive(Clone)]
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_session_from_writer(
        &self,
        session_id: &Uuid,
    ) -> Result<ChatSession, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool.writer)
            .await
            .map_err(query_error)?
            .ok_or(RepositoryError::NotFound)?;

        ChatSessionRow::from_row(&row)
            .map_err(query_error)?
            .into_session()
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatSessionRow {
    id: String,
    user_id: String,
    session_type: String,
    persona: String,
    status: String,
    is_premium: bool,
    summary: Option<String>,
    created_at: String,
    updated_at: String,
    ended_at: Option<String>,
}

impl ChatSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            session_type: row.try_get("session_type")?,
            persona: row.try_get("persona")?,
            status: row.try_get("status")?,
            is_premium: row.try_get("is_premium")?,
            summary: row.try_get("summary")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            ended_at: row.try_get("ended_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, RepositoryError> {
        let status: SessionStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatSession {
            id: parse_uuid(&self.id, "session id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            session_type: self.session_type,
            persona: self.persona,
            status,
            is_premium: self.is_premium,
            summary: self.summary,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
            ended_at: self.ended_at.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

struct ChatMessageRow {
    id: String,
    session_id: String,
    sender: String,
    content: String,
    kind: String,
    audio_url: Option<String>,
    voice: Option<String>,
    tokens_used: i64,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            sender: row.try_get("sender")?,
            content: row.try_get("content")?,
            kind: row.try_get("kind")?,
            audio_url: row.try_get("audio_url")?,
            voice: row.try_get("voice")?,
            tokens_used: row.try_get("tokens_used")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let kind: MessageKind = self
            .kind
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let voice = self
            .voice
            .as_deref()
            .map(str::parse::<Voice>)
            .transpose()
            .map_err(RepositoryError::Query)?;

        Ok(ChatMessage {
            id: parse_uuid(&self.id, "message id")?,
            session_id: parse_uuid(&self.session_id, "session_id")?,
            sender,
            content: self.content,
            kind,
            audio_url: self.audio_url,
            voice,
            tokens_used: u32::try_from(self.tokens_used).unwrap_or(0),
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn rows_to_messages(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<ChatMessage>, RepositoryError> {
    let mut messages = Vec::with_capacity(rows.len());
    for row in rows {
        messages.push(ChatMessageRow::from_row(row).map_err(query_error)?.into_message()?);
    }
    Ok(messages)
}

/// Next message timestamp: now, unless that would not be strictly after the
/// previous message in the session.
fn next_timestamp(last: Option<DateTime<Utc>>) -> DateTime<Utc> {
    // Stored precision is microseconds; compare at that precision.
    let now = Utc::now().trunc_subsecs(6);
    match last {
        Some(prev) if prev >= now => prev + chrono::Duration::microseconds(1),
        _ => now,
    }
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn create_session(&self, session: &ChatSession) -> Result<ChatSession, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;
        let user_id = session.user_id.to_string();

        let row = sqlx::query(
            "SELECT subscription_active, free_sessions_remaining FROM users WHERE id = ?",
        )
        .bind(&user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(query_error)?;
        let Some(row) = row else {
            return Err(RepositoryError::NotFound);
        };
        let subscription_active: bool = row.get("subscription_active");
        let free_sessions: i64 = row.get("free_sessions_remaining");

        let charge = quota::charge_for(subscription_active, session.is_premium);
        let authorized = match charge {
            QuotaCharge::DebitFreeSession => {
                sqlx::query(
                    r#"UPDATE users SET free_sessions_remaining = free_sessions_remaining - 1
                       WHERE id = ? AND free_sessions_remaining > 0"#,
                )
                .bind(&user_id)
                .execute(&mut *tx)
                .await
                .map_err(query_error)?
                .rows_affected()
                    == 1
            }
            QuotaCharge::NoCharge => subscription_active || free_sessions > 0,
        };

        if !authorized {
            tx.rollback().await.map_err(query_error)?;
            return Err(RepositoryError::QuotaExhausted);
        }

        sqlx::query(
            r#"INSERT INTO chat_sessions (id, user_id, session_type, persona, status, is_premium,
                                          summary, created_at, updated_at, ended_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(session.id.to_string())
        .bind(&user_id)
        .bind(&session.session_type)
        .bind(&session.persona)
        .bind(session.status.to_string())
        .bind(session.is_premium)
        .bind(&session.summary)
        .bind(format_datetime(&session.created_at))
        .bind(format_datetime(&session.updated_at))
        .bind(session.ended_at.as_ref().map(format_datetime))
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        tx.commit().await.map_err(query_error)?;
        tracing::debug!(session_id = %session.id, charge = ?charge, "Session inserted");
        Ok(session.clone())
    }

    async fn get_session(&self, session_id: &Uuid) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(
                ChatSessionRow::from_row(&row)
                    .map_err(query_error)?
                    .into_session()?,
            )),
            None => Ok(None),
        }
    }

    async fn list_sessions(&self, user_id: &Uuid) -> Result<Vec<ChatSession>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_sessions WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut sessions = Vec::with_capacity(rows.len());
        for row in &rows {
            sessions.push(ChatSessionRow::from_row(row).map_err(query_error)?.into_session()?);
        }
        Ok(sessions)
    }

    async fn end_session(&self, session_id: &Uuid) -> Result<ChatSession, RepositoryError> {
        let now = format_datetime(&Utc::now());
        // Already-ended sessions match nothing and are returned unchanged.
        sqlx::query(
            r#"UPDATE chat_sessions SET status = 'ended', ended_at = ?, updated_at = ?
               WHERE id = ? AND status = 'active'"#,
        )
        .bind(&now)
        .bind(&now)
        .bind(session_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        self.fetch_session_from_writer(session_id).await
    }

    async fn append_messages(
        &self,
        session_id: &Uuid,
        messages: &[NewChatMessage],
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;
        let sid = session_id.to_string();

        let touched = sqlx::query(
            "UPDATE chat_sessions SET updated_at = ? WHERE id = ? AND status = 'active'",
        )
        .bind(format_datetime(&Utc::now()))
        .bind(&sid)
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        if touched.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM chat_sessions WHERE id = ?")
                .bind(&sid)
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_error)?;
            tx.rollback().await.map_err(query_error)?;
            return match exists {
                Some(_) => Err(RepositoryError::Conflict("session has ended".to_string())),
                None => Err(RepositoryError::NotFound),
            };
        }

        let last: Option<String> = sqlx::query(
            "SELECT MAX(created_at) AS last FROM chat_messages WHERE session_id = ?",
        )
        .bind(&sid)
        .fetch_one(&mut *tx)
        .await
        .map_err(query_error)?
        .try_get("last")
        .map_err(query_error)?;
        let mut last = last.as_deref().map(parse_datetime).transpose()?;

        let mut stored = Vec::with_capacity(messages.len());
        for new in messages {
            let created_at = next_timestamp(last);
            last = Some(created_at);
            let message = ChatMessage {
                id: Uuid::now_v7(),
                session_id: *session_id,
                sender: new.sender,
                content: new.content.clone(),
                kind: new.kind,
                audio_url: None,
                voice: None,
                tokens_used: new.tokens_used,
                created_at,
            };

            sqlx::query(
                r#"INSERT INTO chat_messages (id, session_id, sender, content, kind, tokens_used, created_at)
                   VALUES (?, ?, ?, ?, ?, ?, ?)"#,
            )
            .bind(message.id.to_string())
            .bind(&sid)
            .bind(message.sender.to_string())
            .bind(&message.content)
            .bind(message.kind.to_string())
            .bind(i64::from(message.tokens_used))
            .bind(format_datetime(&message.created_at))
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

            stored.push(message);
        }

        tx.commit().await.map_err(query_error)?;
        Ok(stored)
    }

    async fn get_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_messages WHERE session_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows_to_messages(&rows)
    }

    async fn get_recent_messages(
        &self,
        session_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM chat_messages WHERE session_id = ?
               ORDER BY created_at DESC, id DESC LIMIT ?"#,
        )
        .bind(session_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut messages = rows_to_messages(&rows)?;
        messages.reverse();
        Ok(messages)
    }

    async fn set_message_audio(
        &self,
        message_id: &Uuid,
        audio_url: &str,
        voice: Voice,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE chat_messages SET audio_url = ?, voice = ? WHERE id = ?")
            .bind(audio_url)
            .bind(voice.as_str())
            .bind(message_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn set_summary(&self, session_id: &Uuid, summary: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE chat_sessions SET summary = ?, updated_at = ? WHERE id = ?")
            .bind(summary)
            .bind(format_datetime(&Utc::now()))
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count_sessions(&self, user_id: &Uuid) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM chat_sessions WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let count: i64 = row.try_get("cnt").map_err(query_error)?;
        Ok(count as u64)
    }

    async fn count_messages(&self, user_id: &Uuid) -> Result<u64, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT COUNT(*) AS cnt FROM chat_messages m
               JOIN chat_sessions s ON s.id = m.session_id
               WHERE s.user_id = ?"#,
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let count: i64 = row.try_get("cnt").map_err(query_error)?;
        Ok(count as u64)
    }
}
