//! Infrastructure layer for Desabafa.
//!
//! Contains implementations of the traits defined in `desabafa-core`:
//! SQLite storage, OpenAI-compatible generation and speech providers, audio
//! content stores, Argon2 password hashing, and configuration loading.

pub mod audio;
pub mod config;
pub mod crypto;
pub mod llm;
pub mod speech;
pub mod sqlite;
