//! User account, subscription, and quota projection types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Number of free sessions granted to a newly created user.
pub const DEFAULT_FREE_SESSIONS: u32 = 3;

/// Subscription plan tag.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (subscription_plan IN ('free', 'premium'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Premium,
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionPlan::Free => write!(f, "free"),
            SubscriptionPlan::Premium => write!(f, "premium"),
        }
    }
}

impl FromStr for SubscriptionPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(SubscriptionPlan::Free),
            "premium" => Ok(SubscriptionPlan::Premium),
            other => Err(format!("invalid subscription plan: '{other}'")),
        }
    }
}

/// A user of the service, either registered or anonymous.
///
/// `free_sessions_remaining` is never negative (enforced by the type and by a
/// CHECK constraint). When `subscription_active` is true the free-session
/// counter is ignored by the quota policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// PHC-formatted password hash. Anonymous users have none.
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub is_anonymous: bool,
    pub free_sessions_remaining: u32,
    pub subscription_plan: SubscriptionPlan,
    pub subscription_active: bool,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Build a fresh user on the free plan.
    pub fn new(
        email: impl Into<String>,
        password_hash: Option<String>,
        is_anonymous: bool,
        free_sessions: u32,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            email: email.into(),
            password_hash,
            is_anonymous,
            free_sessions_remaining: free_sessions,
            subscription_plan: SubscriptionPlan::Free,
            subscription_active: false,
            subscription_expires_at: None,
            created_at: Utc::now(),
            last_login: None,
        }
    }
}

/// Requested change to a user's subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    pub plan: SubscriptionPlan,
    pub active: bool,
    /// New expiry; `None` keeps the stored one.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Read-only projection of a user's access state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatus {
    pub user_id: Uuid,
    pub email: String,
    pub is_anonymous: bool,
    pub free_sessions_remaining: u32,
    pub subscription_plan: SubscriptionPlan,
    pub subscription_active: bool,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub can_start_session: bool,
    pub last_login: Option<DateTime<Utc>>,
}

/// Aggregate usage statistics for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: Uuid,
    pub total_sessions: u64,
    pub total_messages: u64,
    pub free_sessions_remaining: u32,
    pub subscription_active: bool,
    pub member_since: DateTime<Utc>,
}
