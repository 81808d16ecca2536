//! SpeechProvider trait definition.

use desabafa_types::speech::{SpeechError, SpeechRequest, TranscriptionRequest};

/// Trait for text-to-speech and speech-to-text backends.
///
/// Implementations live in desabafa-infra (e.g., `OpenAiSpeechProvider`).
pub trait SpeechProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Render `request.text` as audio bytes (MP3).
    fn synthesize(
        &self,
        request: &SpeechRequest,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, SpeechError>> + Send;

    /// Transcribe uploaded audio to text.
    fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> impl std::future::Future<Output = Result<String, SpeechError>> + Send;
}
