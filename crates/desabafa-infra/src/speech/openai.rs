//! OpenAI audio API client: text-to-speech and transcription.
//!
//! Talks to `{base_url}/audio/speech` (JSON in, MP3 out) and
//! `{base_url}/audio/transcriptions` (multipart in, JSON out) with reqwest.

use desabafa_core::speech::provider::SpeechProvider;
use desabafa_types::speech::{SpeechError, SpeechRequest, TranscriptionRequest};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Speech provider for OpenAI-compatible audio endpoints.
///
/// Does NOT derive Debug to keep the API key out of logs.
pub struct OpenAiSpeechProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

#[derive(Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    speed: f32,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl OpenAiSpeechProvider {
    /// `api_key: None` builds a provider whose calls fail with
    /// `SpeechError::AuthenticationFailed`.
    pub fn new(base_url: &str, api_key: Option<SecretString>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn key(&self) -> Result<&str, SpeechError> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret())
            .ok_or(SpeechError::AuthenticationFailed)
    }
}

fn map_send_error(err: reqwest::Error) -> SpeechError {
    if err.is_timeout() {
        SpeechError::Timeout
    } else {
        SpeechError::Provider {
            message: err.to_string(),
        }
    }
}

/// Turn a non-success response into a [`SpeechError`].
async fn status_error(response: reqwest::Response, bad_request_is_audio: bool) -> SpeechError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED => SpeechError::AuthenticationFailed,
        StatusCode::TOO_MANY_REQUESTS => SpeechError::RateLimited,
        StatusCode::BAD_REQUEST if bad_request_is_audio => SpeechError::InvalidAudio(body),
        _ => SpeechError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

impl SpeechProvider for OpenAiSpeechProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, SpeechError> {
        let key = self.key()?;
        let body = SpeechBody {
            model: &request.model,
            input: &request.text,
            voice: request.voice.as_str(),
            speed: request.speed,
            response_format: "mp3",
        };

        let response = self
            .client
            .post(self.endpoint("audio/speech"))
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(status_error(response, false).await);
        }

        let bytes = response.bytes().await.map_err(map_send_error)?;
        Ok(bytes.to_vec())
    }

    async fn transcribe(&self, request: &TranscriptionRequest) -> Result<String, SpeechError> {
        let key = self.key()?;
        let part = reqwest::multipart::Part::bytes(request.audio.clone())
            .file_name(request.file_name.clone())
            .mime_str(&request.content_type)
            .map_err(|e| SpeechError::InvalidAudio(format!("invalid content type: {e}")))?;

        let mut form = reqwest::multipart::Form::new()
            .text("model", request.model.clone())
            .text("response_format", "json")
            .part("file", part);
        if let Some(language) = &request.language {
            form = form.text("language", language.clone());
        }

        let response = self
            .client
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(key)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(status_error(response, true).await);
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Deserialization(e.to_string()))?;
        Ok(parsed.text)
    }
}
