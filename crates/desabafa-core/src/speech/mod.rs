//! Speech provider abstraction (synthesis and transcription).

pub mod box_provider;
pub mod provider;
