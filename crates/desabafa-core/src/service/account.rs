//! Account service: anonymous bootstrap, registration, login, subscription.

use chrono::Utc;
use desabafa_types::error::ServiceError;
use desabafa_types::user::{SubscriptionUpdate, User, UserStats, UserStatus};
use tracing::info;
use uuid::Uuid;

use crate::auth::{self, PasswordHasher};
use crate::quota;
use crate::repository::chat::ChatRepository;
use crate::repository::user::UserRepository;

const ANONYMOUS_EMAIL_DOMAIN: &str = "desabafa.ai";

/// Service owning user identity and subscription state.
///
/// Generic over repository and hashing traits -- desabafa-core never depends
/// on desabafa-infra.
pub struct AccountService<U: UserRepository, C: ChatRepository, H: PasswordHasher> {
    users: U,
    chats: C,
    hasher: H,
    free_sessions: u32,
}

impl<U: UserRepository, C: ChatRepository, H: PasswordHasher> AccountService<U, C, H> {
    /// - `free_sessions`: quota granted to every new account
    pub fn new(users: U, chats: C, hasher: H, free_sessions: u32) -> Self {
        Self {
            users,
            chats,
            hasher,
            free_sessions,
        }
    }

    /// Create an anonymous identity with the signup quota.
    ///
    /// The placeholder email is derived from the user id, so it is unique
    /// without a lookup.
    #[tracing::instrument(name = "create_anonymous_user", skip(self))]
    pub async fn create_anonymous(&self) -> Result<User, ServiceError> {
        let mut user = User::new(String::new(), None, true, self.free_sessions);
        user.email = format!("anonymous_{}@{ANONYMOUS_EMAIL_DOMAIN}", user.id.simple());

        let user = self.users.create_user(&user).await?;
        info!(user_id = %user.id, "Anonymous user created");
        Ok(user)
    }

    /// Register a new account. A taken email yields `ServiceError::Conflict`
    /// and leaves the existing account untouched.
    #[tracing::instrument(name = "register_user", skip(self, email, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let email = auth::normalize_email(email).map_err(ServiceError::Validation)?;
        auth::validate_password(password).map_err(ServiceError::Validation)?;

        let hash = self
            .hasher
            .hash(password)
            .map_err(|e| ServiceError::Storage(format!("password hashing failed: {e}")))?;

        let user = User::new(email, Some(hash), false, self.free_sessions);
        let user = self.users.create_user(&user).await.map_err(|e| match e {
            desabafa_types::error::RepositoryError::Conflict(_) => {
                ServiceError::Conflict("email already registered".to_string())
            }
            other => other.into(),
        })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Verify credentials and stamp `last_login`.
    ///
    /// Unknown emails, anonymous accounts, and wrong passwords all produce
    /// the same `ServiceError::Auth`.
    #[tracing::instrument(name = "authenticate_user", skip(self, email, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let email = auth::normalize_email(email).map_err(|_| ServiceError::Auth)?;
        let user = self
            .users
            .get_user_by_email(&email)
            .await?
            .ok_or(ServiceError::Auth)?;

        let verified = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| self.hasher.verify(password, hash));
        if !verified {
            return Err(ServiceError::Auth);
        }

        let user = self
            .users
            .record_login(&user.id, Utc::now())
            .await
            .map_err(ServiceError::from_repo("user"))?;
        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: &Uuid) -> Result<User, ServiceError> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("user".to_string()))
    }

    pub async fn status(&self, user_id: &Uuid) -> Result<UserStatus, ServiceError> {
        let user = self.get_user(user_id).await?;
        Ok(UserStatus {
            user_id: user.id,
            can_start_session: quota::can_start(&user),
            email: user.email,
            is_anonymous: user.is_anonymous,
            free_sessions_remaining: user.free_sessions_remaining,
            subscription_plan: user.subscription_plan,
            subscription_active: user.subscription_active,
            subscription_expires_at: user.subscription_expires_at,
            last_login: user.last_login,
        })
    }

    pub async fn stats(&self, user_id: &Uuid) -> Result<UserStats, ServiceError> {
        let user = self.get_user(user_id).await?;
        let total_sessions = self.chats.count_sessions(user_id).await?;
        let total_messages = self.chats.count_messages(user_id).await?;

        Ok(UserStats {
            user_id: user.id,
            total_sessions,
            total_messages,
            free_sessions_remaining: user.free_sessions_remaining,
            subscription_active: user.subscription_active,
            member_since: user.created_at,
        })
    }

    #[tracing::instrument(name = "update_subscription", skip(self), fields(plan = %update.plan))]
    pub async fn update_subscription(
        &self,
        user_id: &Uuid,
        update: SubscriptionUpdate,
    ) -> Result<User, ServiceError> {
        let user = self
            .users
            .update_subscription(user_id, &update)
            .await
            .map_err(ServiceError::from_repo("user"))?;
        info!(
            user_id = %user.id,
            plan = %user.subscription_plan,
            active = user.subscription_active,
            "Subscription updated"
        );
        Ok(user)
    }
}
