//! Services orchestrating repositories, providers, and policy.

pub mod account;
pub mod conversation;
pub mod session;
