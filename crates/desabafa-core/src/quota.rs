//! Free-session quota and subscription policy.
//!
//! The pure functions here decide eligibility and cost. Persisting a debit
//! goes through `ChatRepository::create_session`, which applies the same
//! policy to the user row it reads inside its write transaction.

use desabafa_types::user::User;

/// What a session creation costs the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaCharge {
    /// Consume one free session.
    DebitFreeSession,
    /// Consume nothing, but the user must still be eligible.
    NoCharge,
}

/// Whether `user` may start a new session.
pub fn can_start(user: &User) -> bool {
    user.subscription_active || user.free_sessions_remaining > 0
}

/// Decrement the free-session counter if it is positive.
///
/// Returns `false` without touching the user when nothing is left.
pub fn debit_free_session(user: &mut User) -> bool {
    if user.free_sessions_remaining > 0 {
        user.free_sessions_remaining -= 1;
        true
    } else {
        false
    }
}

/// Decide the charge for a session request.
///
/// Premium-flagged sessions and subscribers never consume quota.
pub fn charge_for(subscription_active: bool, is_premium: bool) -> QuotaCharge {
    if is_premium || subscription_active {
        QuotaCharge::NoCharge
    } else {
        QuotaCharge::DebitFreeSession
    }
}
