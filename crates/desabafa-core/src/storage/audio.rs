//! AudioStore trait definition.
//!
//! Keys are opaque handles handed out by the store. The production backend is
//! `FsAudioStore` in desabafa-infra.

use desabafa_types::error::StorageError;
use uuid::Uuid;

const MAX_HANDLE_LEN: usize = 128;

/// Key → bytes store for synthesized and uploaded audio.
pub trait AudioStore: Send + Sync {
    /// A fresh random key (`ai_response_<hex>.mp3`).
    fn generate_key(&self) -> String {
        format!("ai_response_{}.mp3", Uuid::new_v4().simple())
    }

    fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, StorageError>> + Send;
}

/// Reject handles that could name anything outside the store.
///
/// Allowed: ASCII alphanumerics, `_`, `-`, and `.`, not starting with a dot,
/// at most 128 characters.
pub fn validate_handle(handle: &str) -> Result<(), StorageError> {
    let valid = !handle.is_empty()
        && handle.len() <= MAX_HANDLE_LEN
        && !handle.starts_with('.')
        && !handle.contains("..")
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidHandle(handle.to_string()))
    }
}
