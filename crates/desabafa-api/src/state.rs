//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/provider/store traits; AppState pins
//! them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use desabafa_core::llm::box_provider::BoxLlmProvider;
use desabafa_core::service::account::AccountService;
use desabafa_core::service::conversation::{ConversationService, ConversationSettings};
use desabafa_core::service::session::SessionService;
use desabafa_core::speech::box_provider::BoxSpeechProvider;
use desabafa_infra::audio::FsAudioStore;
use desabafa_infra::config::{api_key_from_env, load_config, resolve_audio_dir, resolve_data_dir};
use desabafa_infra::crypto::Argon2PasswordHasher;
use desabafa_infra::llm::openai_compat::OpenAiCompatibleProvider;
use desabafa_infra::llm::openai_compat::config::openai_defaults;
use desabafa_infra::speech::openai::OpenAiSpeechProvider;
use desabafa_infra::sqlite::chat::SqliteChatRepository;
use desabafa_infra::sqlite::pool::{DatabasePool, database_url};
use desabafa_infra::sqlite::user::SqliteUserRepository;
use desabafa_types::config::AppConfig;
use secrecy::{ExposeSecret, SecretString};

/// Retrieval path for stored audio, joined with the handle.
pub const AUDIO_URL_PREFIX: &str = "/api/v1/audio";

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAccountService =
    AccountService<SqliteUserRepository, SqliteChatRepository, Argon2PasswordHasher>;

pub type ConcreteSessionService = SessionService<SqliteUserRepository, SqliteChatRepository>;

pub type ConcreteConversationService = ConversationService<SqliteChatRepository, FsAudioStore>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<ConcreteAccountService>,
    pub session_service: Arc<ConcreteSessionService>,
    pub conversation_service: Arc<ConcreteConversationService>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
    pub api_key_configured: bool,
}

impl AppState {
    /// Initialize from the environment: data dir, `config.toml`, API key.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_config(&data_dir).await;
        Self::build(data_dir, config, api_key_from_env()).await
    }

    /// Connect to the database and wire services.
    pub async fn build(
        data_dir: PathBuf,
        config: AppConfig,
        api_key: Option<SecretString>,
    ) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let users = SqliteUserRepository::new(db_pool.clone());
        let chats = SqliteChatRepository::new(db_pool.clone());

        let api_key_configured = api_key.is_some();
        if !api_key_configured {
            tracing::warn!("OPENAI_API_KEY is not set; generation and speech calls will fail");
        }

        // Each provider keeps its own copy of the key.
        let speech_key = api_key
            .as_ref()
            .map(|k| SecretString::from(k.expose_secret().to_string()));
        let llm = OpenAiCompatibleProvider::new(openai_defaults(
            api_key,
            &config.llm.model,
            Some(&config.llm.base_url),
        ));
        let speech = OpenAiSpeechProvider::new(&config.speech.base_url, speech_key);

        let language = config.speech.language.trim();
        let settings = ConversationSettings {
            model: config.llm.model.clone(),
            synthesis_model: config.speech.synthesis_model.clone(),
            transcription_model: config.speech.transcription_model.clone(),
            language: (!language.is_empty()).then(|| language.to_string()),
            speed: config.speech.speed,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            audio_url_prefix: AUDIO_URL_PREFIX.to_string(),
            max_upload_bytes: config.server.max_upload_bytes,
        };

        let audio = FsAudioStore::new(resolve_audio_dir(&config, &data_dir));

        let account_service = AccountService::new(
            users.clone(),
            chats.clone(),
            Argon2PasswordHasher,
            config.free_sessions_on_signup,
        );
        let session_service = SessionService::new(users, chats.clone());
        let conversation_service = ConversationService::new(
            chats,
            audio,
            BoxLlmProvider::new(llm),
            BoxSpeechProvider::new(speech),
            settings,
        );

        Ok(Self {
            account_service: Arc::new(account_service),
            session_service: Arc::new(session_service),
            conversation_service: Arc::new(conversation_service),
            config: Arc::new(config),
            data_dir,
            db_pool,
            api_key_configured,
        })
    }
}
