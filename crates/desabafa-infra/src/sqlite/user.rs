//! SQLite user repository implementation.

use chrono::{DateTime, Utc};
use desabafa_core::repository::user::UserRepository;
use desabafa_types::error::RepositoryError;
use desabafa_types::user::{SubscriptionPlan, SubscriptionUpdate, User};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

/// SQLite-backed implementation of `UserRepository`.
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Read a user through the writer, so a row just written by this pool is
    /// always visible.
    async fn fetch_from_writer(&self, id: &Uuid) -> Result<User, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.writer)
            .await
            .map_err(query_error)?
            .ok_or(RepositoryError::NotFound)?;

        UserRow::from_row(&row).map_err(query_error)?.into_user()
    }
}

/// Internal row type for mapping SQLite rows to domain User.
struct UserRow {
    id: String,
    email: String,
    password_hash: Option<String>,
    is_anonymous: bool,
    free_sessions_remaining: i64,
    subscription_plan: String,
    subscription_active: bool,
    subscription_expires_at: Option<String>,
    created_at: String,
    last_login: Option<String>,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            is_anonymous: row.try_get("is_anonymous")?,
            free_sessions_remaining: row.try_get("free_sessions_remaining")?,
            subscription_plan: row.try_get("subscription_plan")?,
            subscription_active: row.try_get("subscription_active")?,
            subscription_expires_at: row.try_get("subscription_expires_at")?,
            created_at: row.try_get("created_at")?,
            last_login: row.try_get("last_login")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let subscription_plan: SubscriptionPlan = self
            .subscription_plan
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(User {
            id: parse_uuid(&self.id, "user id")?,
            email: self.email,
            password_hash: self.password_hash,
            is_anonymous: self.is_anonymous,
            free_sessions_remaining: u32::try_from(self.free_sessions_remaining).unwrap_or(0),
            subscription_plan,
            subscription_active: self.subscription_active,
            subscription_expires_at: self
                .subscription_expires_at
                .as_deref()
                .map(parse_datetime)
                .transpose()?,
            created_at: parse_datetime(&self.created_at)?,
            last_login: self.last_login.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, user: &User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO users (id, email, password_hash, is_anonymous, free_sessions_remaining,
                                  subscription_plan, subscription_active, subscription_expires_at,
                                  created_at, last_login)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_anonymous)
        .bind(i64::from(user.free_sessions_remaining))
        .bind(user.subscription_plan.to_string())
        .bind(user.subscription_active)
        .bind(user.subscription_expires_at.as_ref().map(format_datetime))
        .bind(format_datetime(&user.created_at))
        .bind(user.last_login.as_ref().map(format_datetime))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(user.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("email '{}' already exists", user.email)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_user(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(UserRow::from_row(&row).map_err(query_error)?.into_user()?)),
            None => Ok(None),
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => Ok(Some(UserRow::from_row(&row).map_err(query_error)?.into_user()?)),
            None => Ok(None),
        }
    }

    async fn record_login(&self, id: &Uuid, at: DateTime<Utc>) -> Result<User, RepositoryError> {
        let result = sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(format_datetime(&at))
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.fetch_from_writer(id).await
    }

    async fn update_subscription(
        &self,
        id: &Uuid,
        update: &SubscriptionUpdate,
    ) -> Result<User, RepositoryError> {
        // A missing expiry keeps the stored one.
        let result = sqlx::query(
            r#"UPDATE users
               SET subscription_plan = ?, subscription_active = ?,
                   subscription_expires_at = COALESCE(?, subscription_expires_at)
               WHERE id = ?"#,
        )
        .bind(update.plan.to_string())
        .bind(update.active)
        .bind(update.expires_at.as_ref().map(format_datetime))
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.fetch_from_writer(id).await
    }
}
