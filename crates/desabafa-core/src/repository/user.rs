//! UserRepository trait definition.

use chrono::{DateTime, Utc};
use desabafa_types::error::RepositoryError;
use desabafa_types::user::{SubscriptionUpdate, User};
use uuid::Uuid;

/// Repository trait for user persistence.
///
/// Implementations live in desabafa-infra (e.g., `SqliteUserRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// Returns `RepositoryError::Conflict` when the email is already taken.
    /// Uniqueness is enforced by the store, not by a prior lookup.
    fn create_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    fn get_user(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up a user by normalized (trimmed, lowercased) email.
    fn get_user_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Stamp `last_login` and return the updated user.
    fn record_login(
        &self,
        id: &Uuid,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Overwrite the subscription fields and return the updated user.
    fn update_subscription(
        &self,
        id: &Uuid,
        update: &SubscriptionUpdate,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;
}
