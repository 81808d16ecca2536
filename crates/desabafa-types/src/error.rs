use thiserror::Error;

use crate::llm::LlmError;
use crate::speech::SpeechError;

/// Errors from repository operations (used by trait definitions in desabafa-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    /// The guarded quota debit matched no row: no free sessions left and no
    /// active subscription.
    #[error("free session quota exhausted")]
    QuotaExhausted,
}

/// Errors from audio content stores.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("audio not found: {0}")]
    NotFound(String),

    #[error("invalid audio handle: '{0}'")]
    InvalidHandle(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Errors returned by service operations to the transport layer.
///
/// Every variant carries a stable machine code (see [`ServiceError::code`]) so
/// clients can localize the message.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("no free sessions remaining; upgrade to premium to continue")]
    QuotaExceeded,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid credentials")]
    Auth,

    #[error("upstream service failed: {message}")]
    Upstream { message: String, retryable: bool },

    #[error("upstream service timed out")]
    UpstreamTimeout,

    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::QuotaExceeded => "QUOTA_EXCEEDED",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::Auth => "INVALID_CREDENTIALS",
            ServiceError::Upstream { .. } => "UPSTREAM_ERROR",
            ServiceError::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            ServiceError::Storage(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Upstream { retryable, .. } => *retryable,
            ServiceError::UpstreamTimeout => true,
            _ => false,
        }
    }

    /// Map a repository `NotFound` to a service error naming the entity.
    pub fn from_repo(entity: &str) -> impl FnOnce(RepositoryError) -> ServiceError + '_ {
        move |err| match err {
            RepositoryError::NotFound => ServiceError::NotFound(entity.to_string()),
            other => other.into(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound("entity".to_string()),
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            RepositoryError::QuotaExhausted => ServiceError::QuotaExceeded,
            RepositoryError::Connection | RepositoryError::Query(_) => {
                ServiceError::Storage(err.to_string())
            }
        }
    }
}

impl From<LlmError> for ServiceError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout => ServiceError::UpstreamTimeout,
            other => ServiceError::Upstream {
                retryable: other.is_retryable(),
                message: other.to_string(),
            },
        }
    }
}

impl From<SpeechError> for ServiceError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Timeout => ServiceError::UpstreamTimeout,
            SpeechError::InvalidAudio(msg) => ServiceError::Validation(msg),
            other => ServiceError::Upstream {
                retryable: matches!(other, SpeechError::RateLimited),
                message: other.to_string(),
            },
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => ServiceError::NotFound("audio".to_string()),
            StorageError::InvalidHandle(h) => {
                ServiceError::Validation(format!("invalid audio handle '{h}'"))
            }
            StorageError::Io(msg) => ServiceError::Storage(msg),
        }
    }
}
