//! Shared domain types for Desabafa.
//!
//! This crate contains the domain types used across the Desabafa backend:
//! users and their quota, chat sessions and messages, personas, speech voices,
//! generation request/response shapes, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod persona;
pub mod speech;
pub mod user;
