//! Conversation service: reply generation, speech, and summaries.
//!
//! Every backend call is bounded by the configured request timeout and
//! persistence happens only after the backend has answered, so a failed call
//! never leaves a partial message behind.

use std::time::Duration;

use chrono::Utc;
use desabafa_types::chat::{
    ChatMessage, ChatReply, ChatSession, NewChatMessage, Sender, SessionSummary,
};
use desabafa_types::error::ServiceError;
use desabafa_types::llm::{CompletionRequest, LlmError};
use desabafa_types::persona::PersonaSummary;
use desabafa_types::speech::{
    SpeechError, SpeechRequest, SynthesizedAudio, TranscriptionRequest, Voice, VoiceInfo,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::summary::{SUMMARY_PARAMS, summary_prompt};
use crate::chat::window::{WINDOW_SIZE, build_window};
use crate::llm::box_provider::BoxLlmProvider;
use crate::persona::PersonaRegistry;
use crate::repository::chat::ChatRepository;
use crate::service::session::{append_error, validate_message};
use crate::speech::box_provider::BoxSpeechProvider;
use crate::storage::audio::{AudioStore, validate_handle};

/// Longest text accepted for synthesis, in characters.
pub const MAX_SYNTHESIS_CHARS: usize = 4096;

/// File extensions accepted for transcription when the upload carries no
/// audio MIME type.
const AUDIO_EXTENSIONS: [&str; 9] = [
    "flac", "m4a", "mp3", "mp4", "mpeg", "mpga", "oga", "ogg", "wav",
];

/// Backend models and limits for the conversation pipeline.
#[derive(Debug, Clone)]
pub struct ConversationSettings {
    pub model: String,
    pub synthesis_model: String,
    pub transcription_model: String,
    pub language: Option<String>,
    pub speed: f32,
    pub request_timeout: Duration,
    /// Prefix joined with an audio handle to form its retrieval URL.
    pub audio_url_prefix: String,
    pub max_upload_bytes: usize,
}

/// One turn of user input for reply generation.
#[derive(Debug, Clone)]
pub struct ChatCommand {
    pub session_id: Uuid,
    pub text: String,
    /// Also synthesize the reply. Best effort.
    pub synthesize: bool,
    pub voice: Option<Voice>,
    /// Persist `text` as a user message together with the reply.
    pub record_user_message: bool,
}

/// Uploaded audio to transcribe into a session.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub session_id: Uuid,
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: Option<String>,
}

pub struct ConversationService<C: ChatRepository, A: AudioStore> {
    chats: C,
    audio: A,
    llm: BoxLlmProvider,
    speech: BoxSpeechProvider,
    settings: ConversationSettings,
}

impl<C: ChatRepository, A: AudioStore> ConversationService<C, A> {
    pub fn new(
        chats: C,
        audio: A,
        llm: BoxLlmProvider,
        speech: BoxSpeechProvider,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            chats,
            audio,
            llm,
            speech,
            settings,
        }
    }

    pub fn settings(&self) -> &ConversationSettings {
        &self.settings
    }

    pub fn personas(&self) -> Vec<PersonaSummary> {
        PersonaRegistry::global().list()
    }

    pub fn voices(&self) -> Vec<VoiceInfo> {
        Voice::ALL
            .into_iter()
            .map(|voice| VoiceInfo {
                id: voice,
                description: voice.description().to_string(),
                is_default: voice == Voice::default(),
            })
            .collect()
    }

    async fn active_session(&self, session_id: &Uuid) -> Result<ChatSession, ServiceError> {
        let session = self
            .chats
            .get_session(session_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("session".to_string()))?;
        if !session.is_active() {
            return Err(ServiceError::Conflict("session has ended".to_string()));
        }
        Ok(session)
    }

    /// Generate the persona's reply to `command.text`.
    ///
    /// Persists exactly one assistant message (plus the user message when
    /// `record_user_message` is set, in the same transaction). Synthesis, if
    /// requested, runs after the reply is stored and only annotates it; its
    /// failure is logged and the reply is returned without audio.
    #[tracing::instrument(
        name = "chat",
        skip(self, command),
        fields(session_id = %command.session_id, synthesize = command.synthesize)
    )]
    pub async fn chat(&self, command: ChatCommand) -> Result<ChatReply, ServiceError> {
        let text = validate_message(&command.text)?;
        let session = self.active_session(&command.session_id).await?;
        let persona = PersonaRegistry::global().resolve(&session.persona);

        let history = self
            .chats
            .get_recent_messages(&session.id, WINDOW_SIZE as u32)
            .await?;

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: build_window(persona, &history, text),
            params: persona.params,
        };

        let response = tokio::time::timeout(self.settings.request_timeout, self.llm.complete(&request))
            .await
            .map_err(|_| LlmError::Timeout)??;

        let content = response.content.trim();
        if content.is_empty() {
            return Err(LlmError::Deserialization("empty completion".to_string()).into());
        }
        let tokens_used = response.usage.total();

        let mut pending = Vec::with_capacity(2);
        if command.record_user_message {
            pending.push(NewChatMessage::text(Sender::User, text, 0));
        }
        pending.push(NewChatMessage::text(Sender::Ai, content, tokens_used));

        let mut stored = self
            .chats
            .append_messages(&session.id, &pending)
            .await
            .map_err(append_error)?;
        let mut message = stored
            .pop()
            .ok_or_else(|| ServiceError::Storage("append returned no message".to_string()))?;
        let user_message = stored.pop();

        info!(
            message_id = %message.id,
            persona = persona.id,
            tokens_used,
            "Reply generated"
        );

        if command.synthesize {
            let voice = command.voice.unwrap_or_default();
            self.attach_audio(&mut message, voice).await;
        }

        Ok(ChatReply {
            message,
            user_message,
            persona: persona.id.to_string(),
        })
    }

    /// Synthesize `message` and record the audio on it. Never fails.
    async fn attach_audio(&self, message: &mut ChatMessage, voice: Voice) {
        let audio = match self.synthesize(&message.content, Some(voice)).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "Reply synthesis failed, returning text only");
                return;
            }
        };

        match self
            .chats
            .set_message_audio(&message.id, &audio.url, voice)
            .await
        {
            Ok(()) => {
                message.audio_url = Some(audio.url);
                message.voice = Some(voice);
            }
            Err(e) => {
                warn!(message_id = %message.id, error = %e, "Failed to record reply audio");
            }
        }
    }

    /// Standalone text-to-speech. The audio is kept in the store and exposed
    /// through the returned handle.
    #[tracing::instrument(name = "synthesize", skip(self, text), fields(chars = text.len()))]
    pub async fn synthesize(
        &self,
        text: &str,
        voice: Option<Voice>,
    ) -> Result<SynthesizedAudio, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::Validation("text cannot be empty".to_string()));
        }
        if text.chars().count() > MAX_SYNTHESIS_CHARS {
            return Err(ServiceError::Validation(format!(
                "text exceeds {MAX_SYNTHESIS_CHARS} characters"
            )));
        }

        let voice = voice.unwrap_or_default();
        let request = SpeechRequest {
            model: self.settings.synthesis_model.clone(),
            text: text.to_string(),
            voice,
            speed: self.settings.speed,
        };

        let bytes = tokio::time::timeout(
            self.settings.request_timeout,
            self.speech.synthesize(&request),
        )
        .await
        .map_err(|_| SpeechError::Timeout)??;
        if bytes.is_empty() {
            return Err(SpeechError::Deserialization("empty audio".to_string()).into());
        }

        let handle = self.audio.generate_key();
        self.audio.put(&handle, bytes).await?;

        Ok(SynthesizedAudio {
            url: format!("{}/{handle}", self.settings.audio_url_prefix.trim_end_matches('/')),
            handle,
            voice,
            text: text.to_string(),
        })
    }

    /// Fetch stored audio bytes by handle.
    pub async fn retrieve_audio(&self, handle: &str) -> Result<Vec<u8>, ServiceError> {
        validate_handle(handle)?;
        Ok(self.audio.get(handle).await?)
    }

    /// Transcribe uploaded speech into a user message on the session.
    #[tracing::instrument(
        name = "transcribe",
        skip(self, upload),
        fields(session_id = %upload.session_id, bytes = upload.bytes.len())
    )]
    pub async fn transcribe(&self, upload: AudioUpload) -> Result<ChatMessage, ServiceError> {
        if upload.bytes.is_empty() {
            return Err(ServiceError::Validation("audio file is empty".to_string()));
        }
        if upload.bytes.len() > self.settings.max_upload_bytes {
            return Err(ServiceError::Validation(format!(
                "audio file exceeds {} bytes",
                self.settings.max_upload_bytes
            )));
        }
        if !is_audio_upload(upload.content_type.as_deref(), &upload.file_name) {
            return Err(ServiceError::Validation(
                "unsupported audio format".to_string(),
            ));
        }

        let session = self.active_session(&upload.session_id).await?;

        let request = TranscriptionRequest {
            model: self.settings.transcription_model.clone(),
            content_type: upload
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            file_name: upload.file_name,
            audio: upload.bytes,
            language: self.settings.language.clone(),
        };

        let text = tokio::time::timeout(
            self.settings.request_timeout,
            self.speech.transcribe(&request),
        )
        .await
        .map_err(|_| SpeechError::Timeout)??;

        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::Upstream {
                message: "no speech recognized".to_string(),
                retryable: false,
            });
        }

        let mut stored = self
            .chats
            .append_messages(&session.id, &[NewChatMessage::transcribed(text)])
            .await
            .map_err(append_error)?;
        let message = stored
            .pop()
            .ok_or_else(|| ServiceError::Storage("append returned no message".to_string()))?;

        info!(message_id = %message.id, "Audio transcribed");
        Ok(message)
    }

    /// Summarize the full transcript and overwrite the session summary.
    #[tracing::instrument(name = "summarize_session", skip(self))]
    pub async fn summarize(&self, session_id: &Uuid) -> Result<SessionSummary, ServiceError> {
        if self.chats.get_session(session_id).await?.is_none() {
            return Err(ServiceError::NotFound("session".to_string()));
        }

        let messages = self.chats.get_messages(session_id).await?;
        if messages.is_empty() {
            return Err(ServiceError::Validation(
                "session has no messages to summarize".to_string(),
            ));
        }

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: summary_prompt(&messages),
            params: SUMMARY_PARAMS,
        };
        let response = tokio::time::timeout(self.settings.request_timeout, self.llm.complete(&request))
            .await
            .map_err(|_| LlmError::Timeout)??;

        let summary = response.content.trim().to_string();
        if summary.is_empty() {
            return Err(LlmError::Deserialization("empty summary".to_string()).into());
        }

        self.chats
            .set_summary(session_id, &summary)
            .await
            .map_err(ServiceError::from_repo("session"))?;

        info!(session_id = %session_id, message_count = messages.len(), "Session summarized");
        Ok(SessionSummary {
            session_id: *session_id,
            summary,
            generated_at: Utc::now(),
        })
    }
}

/// Accept an upload if it declares an audio MIME type or has a known audio
/// extension.
pub fn is_audio_upload(content_type: Option<&str>, file_name: &str) -> bool {
    let mime_ok = content_type.is_some_and(|ct| {
        let ct = ct.trim().to_ascii_lowercase();
        ct.starts_with("audio/") || ct.starts_with("video/webm")
    });
    if mime_ok {
        return true;
    }
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| ext == "webm" || AUDIO_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use desabafa_types::chat::MessageKind;
    use desabafa_types::llm::MessageRole;
    use desabafa_types::user::User;

    use crate::testing::{MemoryAudioStore, MemoryStore, MockLlm, MockSpeech};

    struct Fixture {
        store: MemoryStore,
        audio: MemoryAudioStore,
        llm: MockLlm,
        speech: MockSpeech,
        service: ConversationService<MemoryStore, MemoryAudioStore>,
    }

    fn settings() -> ConversationSettings {
        ConversationSettings {
            model: "test-model".to_string(),
            synthesis_model: "tts-test".to_string(),
            transcription_model: "stt-test".to_string(),
            language: Some("pt".to_string()),
            speed: 1.0,
            request_timeout: Duration::from_secs(5),
            audio_url_prefix: "/api/v1/audio".to_string(),
            max_upload_bytes: 1024,
        }
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::default();
        let audio = MemoryAudioStore::default();
        let llm = MockLlm::replying("Estou aqui com você.");
        let speech = MockSpeech::default();
        let service = ConversationService::new(
            store.clone(),
            audio.clone(),
            BoxLlmProvider::new(llm.clone()),
            BoxSpeechProvider::new(speech.clone()),
            settings(),
        );
        Fixture {
            store,
            audio,
            llm,
            speech,
            service,
        }
    }

    async fn open_session(store: &MemoryStore, persona: &str) -> ChatSession {
        let user = User::new("u@example.com", None, true, 3);
        store.put_user(user.clone());
        let session = ChatSession::new(user.id, "emocional".into(), persona.into(), false);
        store
            .create_session(&session)
            .await
            .unwrap()
    }

    fn command(session_id: Uuid, text: &str) -> ChatCommand {
        ChatCommand {
            session_id,
            text: text.to_string(),
            synthesize: false,
            voice: None,
            record_user_message: false,
        }
    }

    #[tokio::test]
    async fn test_chat_persists_single_ai_message() {
        let f = fixture();
        let session = open_session(&f.store, "coach").await;

        let reply = f.service.chat(command(session.id, "oi")).await.unwrap();
        assert_eq!(reply.message.sender, Sender::Ai);
        assert_eq!(reply.message.content, "Estou aqui com você.");
        assert_eq!(reply.message.tokens_used, 30);
        assert_eq!(reply.persona, "coach");
        assert!(reply.user_message.is_none());

        let messages = f.store.get_messages(&session.id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert!(f.store.session(&session.id).updated_at >= session.updated_at);
    }

    #[tokio::test]
    async fn test_append_then_chat_stores_user_turn_once() {
        let f = fixture();
        let session = open_session(&f.store, "psicologo").await;
        f.store
            .append_messages(&session.id, &[NewChatMessage::text(Sender::User, "oi", 0)])
            .await
            .unwrap();

        f.service.chat(command(session.id, "oi")).await.unwrap();

        let messages = f.store.get_messages(&session.id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages.iter().filter(|m| m.sender == Sender::User).count(),
            1
        );
        assert_eq!(messages[1].sender, Sender::Ai);
    }

    #[tokio::test]
    async fn test_chat_first_turn_uses_greeting_and_persona_params() {
        let f = fixture();
        let session = open_session(&f.store, "conselheiro_espiritual").await;
        f.service.chat(command(session.id, "oi")).await.unwrap();

        let request = f.llm.last_request().unwrap();
        assert_eq!(request.model, "test-model");
        assert_eq!(request.params.max_tokens, 200);
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[1].role, MessageRole::Assistant);
        assert!(request.messages[1].content.contains("Luz"));
    }

    #[tokio::test]
    async fn test_chat_window_bounded_to_last_ten() {
        let f = fixture();
        let session = open_session(&f.store, "psicologo").await;
        for i in 0..15 {
            let sender = if i % 2 == 0 { Sender::User } else { Sender::Ai };
            f.store
                .append_messages(&session.id, &[NewChatMessage::text(sender, format!("h{i}"), 0)])
                .await
                .unwrap();
        }

        f.service.chat(command(session.id, "nova")).await.unwrap();
        let request = f.llm.last_request().unwrap();
        assert_eq!(request.messages.len(), 12);
        assert_eq!(request.messages[1].content, "h5");
        assert_eq!(request.messages[10].content, "h14");
        assert_eq!(request.messages[11].content, "nova");
    }

    #[tokio::test]
    async fn test_chat_can_record_user_message_atomically() {
        let f = fixture();
        let session = open_session(&f.store, "coach").await;
        let mut cmd = command(session.id, "preciso de ajuda");
        cmd.record_user_message = true;

        let reply = f.service.chat(cmd).await.unwrap();
        let user_message = reply.user_message.unwrap();
        assert_eq!(user_message.sender, Sender::User);
        assert!(user_message.created_at < reply.message.created_at);
        assert_eq!(f.store.get_messages(&session.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_chat_upstream_failure_persists_nothing() {
        let f = fixture();
        let session = open_session(&f.store, "coach").await;
        f.llm.fail_with(|| LlmError::Overloaded("busy".into()));
        let mut cmd = command(session.id, "oi");
        cmd.record_user_message = true;

        let err = f.service.chat(cmd).await.unwrap_err();
        assert!(matches!(err, ServiceError::Upstream { retryable: true, .. }));
        assert!(f.store.get_messages(&session.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_timeout_is_retryable() {
        let mut f = fixture();
        f.service.settings.request_timeout = Duration::from_millis(20);
        f.llm.delay(Duration::from_millis(200));
        let session = open_session(&f.store, "coach").await;

        let err = f.service.chat(command(session.id, "oi")).await.unwrap_err();
        assert!(matches!(err, ServiceError::UpstreamTimeout));
        assert!(err.is_retryable());
        assert!(f.store.get_messages(&session.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_with_synthesis_annotates_reply() {
        let f = fixture();
        let session = open_session(&f.store, "coach").await;
        let mut cmd = command(session.id, "oi");
        cmd.synthesize = true;
        cmd.voice = Some(Voice::Onyx);

        let reply = f.service.chat(cmd).await.unwrap();
        let url = reply.message.audio_url.clone().unwrap();
        assert!(url.starts_with("/api/v1/audio/ai_response_"));
        assert_eq!(reply.message.voice, Some(Voice::Onyx));

        let stored = f.store.get_messages(&session.id).await.unwrap();
        assert_eq!(stored[0].audio_url.as_deref(), Some(url.as_str()));
        assert_eq!(f.speech.synthesized_voices(), vec![Voice::Onyx]);
    }

    #[tokio::test]
    async fn test_synthesis_failure_still_returns_text_reply() {
        let f = fixture();
        let session = open_session(&f.store, "coach").await;
        f.speech.fail_synthesis();
        let mut cmd = command(session.id, "oi");
        cmd.synthesize = true;

        let reply = f.service.chat(cmd).await.unwrap();
        assert_eq!(reply.message.content, "Estou aqui com você.");
        assert!(reply.message.audio_url.is_none());
        assert!(reply.message.voice.is_none());

        let stored = f.store.get_messages(&session.id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].audio_url.is_none());
    }

    #[tokio::test]
    async fn test_chat_rejects_ended_and_missing_sessions() {
        let f = fixture();
        let session = open_session(&f.store, "coach").await;
        f.store.end_session(&session.id).await.unwrap();

        assert!(matches!(
            f.service.chat(command(session.id, "oi")).await,
            Err(ServiceError::Conflict(_))
        ));
        assert!(matches!(
            f.service.chat(command(Uuid::now_v7(), "oi")).await,
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(f.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_transcribe_persists_zero_cost_user_message() {
        let f = fixture();
        let session = open_session(&f.store, "coach").await;
        let upload = AudioUpload {
            session_id: session.id,
            bytes: vec![1, 2, 3],
            file_name: "gravacao.webm".to_string(),
            content_type: Some("audio/webm".to_string()),
        };

        let message = f.service.transcribe(upload).await.unwrap();
        assert_eq!(message.sender, Sender::User);
        assert_eq!(message.kind, MessageKind::Audio);
        assert_eq!(message.tokens_used, 0);
        assert_eq!(message.content, "texto transcrito");
    }

    #[tokio::test]
    async fn test_transcribe_failure_persists_nothing() {
        let f = fixture();
        let session = open_session(&f.store, "coach").await;
        f.speech.fail_transcription();
        let upload = AudioUpload {
            session_id: session.id,
            bytes: vec![1, 2, 3],
            file_name: "a.mp3".to_string(),
            content_type: None,
        };

        assert!(f.service.transcribe(upload).await.is_err());
        assert!(f.store.get_messages(&session.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transcribe_validates_upload() {
        let f = fixture();
        let session = open_session(&f.store, "coach").await;
        let mut upload = AudioUpload {
            session_id: session.id,
            bytes: Vec::new(),
            file_name: "a.mp3".to_string(),
            content_type: None,
        };
        assert!(matches!(
            f.service.transcribe(upload.clone()).await,
            Err(ServiceError::Validation(_))
        ));

        upload.bytes = vec![0; 2048];
        assert!(matches!(
            f.service.transcribe(upload.clone()).await,
            Err(ServiceError::Validation(_))
        ));

        upload.bytes = vec![0; 16];
        upload.file_name = "notes.txt".to_string();
        upload.content_type = Some("text/plain".to_string());
        assert!(matches!(
            f.service.transcribe(upload).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_synthesize_and_retrieve_roundtrip() {
        let f = fixture();
        let audio = f.service.synthesize("Olá", None).await.unwrap();
        assert_eq!(audio.voice, Voice::Nova);

        let bytes = f.service.retrieve_audio(&audio.handle).await.unwrap();
        assert_eq!(bytes, b"ID3-fake-mp3".to_vec());
        assert_eq!(f.audio.len(), 1);
    }

    #[tokio::test]
    async fn test_retrieve_audio_missing_and_invalid() {
        let f = fixture();
        assert!(matches!(
            f.service.retrieve_audio("ai_response_missing.mp3").await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            f.service.retrieve_audio("../secrets").await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_summarize_empty_session_is_validation_error() {
        let f = fixture();
        let session = open_session(&f.store, "coach").await;
        assert!(matches!(
            f.service.summarize(&session.id).await,
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(f.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_summarize_overwrites_previous_summary() {
        let f = fixture();
        let session = open_session(&f.store, "coach").await;
        f.store
            .append_messages(&session.id, &[NewChatMessage::text(Sender::User, "oi", 0)])
            .await
            .unwrap();

        f.llm.set_reply("primeiro resumo");
        f.service.summarize(&session.id).await.unwrap();
        f.llm.set_reply("segundo resumo");
        let second = f.service.summarize(&session.id).await.unwrap();

        assert_eq!(second.summary, "segundo resumo");
        assert_eq!(
            f.store.session(&session.id).summary.as_deref(),
            Some("segundo resumo")
        );

        let request = f.llm.last_request().unwrap();
        assert_eq!(request.params.max_tokens, 300);
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn test_voices_listing_marks_default() {
        let f = fixture();
        let voices = f.service.voices();
        assert_eq!(voices.len(), 6);
        let defaults: Vec<_> = voices.iter().filter(|v| v.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, Voice::Nova);
    }

    #[test]
    fn test_is_audio_upload() {
        assert!(is_audio_upload(Some("audio/mpeg"), "x"));
        assert!(is_audio_upload(Some("video/webm"), "x"));
        assert!(is_audio_upload(None, "voz.M4A"));
        assert!(!is_audio_upload(Some("image/png"), "foto.png"));
        assert!(!is_audio_upload(None, "semextensao"));
    }
}
