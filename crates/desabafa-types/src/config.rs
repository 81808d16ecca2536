//! Configuration types for Desabafa.
//!
//! `AppConfig` represents the `config.toml` in the data directory. Every
//! field is optional in the file and falls back to a default.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.desabafa/config.toml` (or `$DESABAFA_DATA_DIR/config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upper bound on any single call to a generation or speech backend.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Free sessions granted to every new account.
    #[serde(default = "default_free_sessions")]
    pub free_sessions_on_signup: u32,

    /// Directory for synthesized audio, relative to the data directory
    /// unless absolute.
    #[serde(default = "default_audio_dir")]
    pub audio_dir: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub speech: SpeechConfig,
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_free_sessions() -> u32 {
    crate::user::DEFAULT_FREE_SESSIONS
}

fn default_audio_dir() -> String {
    "audio".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            free_sessions_on_signup: default_free_sessions(),
            audio_dir: default_audio_dir(),
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted upload, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            base_url: default_base_url(),
        }
    }
}

/// Speech backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_synthesis_model")]
    pub synthesis_model: String,
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_synthesis_model() -> String {
    "tts-1".to_string()
}

fn default_transcription_model() -> String {
    "whisper-1".to_string()
}

fn default_language() -> String {
    "pt".to_string()
}

fn default_speed() -> f32 {
    1.0
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            synthesis_model: default_synthesis_model(),
            transcription_model: default_transcription_model(),
            language: default_language(),
            speed: default_speed(),
        }
    }
}
