//! Configuration for the OpenAI-compatible generation provider.

use secrecy::SecretString;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible chat completions endpoint.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key. `None` builds a provider whose calls fail with
    /// `LlmError::AuthenticationFailed`.
    pub api_key: Option<SecretString>,
    /// Model used when a request leaves `model` empty.
    pub model: String,
}

/// OpenAI defaults with an optional base URL override.
pub fn openai_defaults(
    api_key: Option<SecretString>,
    model: &str,
    base_url: Option<&str>,
) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: base_url.unwrap_or(OPENAI_BASE_URL).trim_end_matches('/').into(),
        api_key,
        model: model.into(),
    }
}
