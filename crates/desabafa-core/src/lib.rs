//! Business logic and repository trait definitions for Desabafa.
//!
//! This crate defines the "ports" (repository, provider, and store traits)
//! that the infrastructure layer implements, plus the quota policy, persona
//! registry, conversation window builder, and the services that tie them
//! together. It depends only on `desabafa-types` -- never on `desabafa-infra`
//! or any database/IO crate.

pub mod auth;
pub mod chat;
pub mod llm;
pub mod persona;
pub mod quota;
pub mod repository;
pub mod service;
pub mod speech;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
