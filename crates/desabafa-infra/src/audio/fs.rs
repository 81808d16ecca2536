//! Local filesystem audio store.
//!
//! Each handle is a flat file name under `{base_dir}`. Handles are validated
//! before any path is built, so nothing outside `base_dir` is reachable.

use std::path::PathBuf;

use desabafa_core::storage::audio::{AudioStore, validate_handle};
use desabafa_types::error::StorageError;

pub struct FsAudioStore {
    base_dir: PathBuf,
}

impl FsAudioStore {
    /// Audio files live directly under `base_dir`, created on first write.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_handle(key)?;
        Ok(self.base_dir.join(key))
    }
}

impl AudioStore for FsAudioStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| StorageError::Io(format!("failed to create audio dir: {e}")))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::Io(format!("failed to write audio: {e}")))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::Io(format!("failed to read audio: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAudioStore::new(dir.path().join("audio"));

        let key = store.generate_key();
        store.put(&key, b"ID3-data".to_vec()).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), b"ID3-data");
        assert!(dir.path().join("audio").join(&key).exists());
    }

    #[tokio::test]
    async fn test_missing_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAudioStore::new(dir.path().to_path_buf());
        let err = store.get("ai_response_missing.mp3").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAudioStore::new(dir.path().join("audio"));
        tokio::fs::write(dir.path().join("secret.txt"), b"x").await.unwrap();

        let err = store.get("../secret.txt").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidHandle(_)));
        let err = store.put("../evil.mp3", vec![1]).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidHandle(_)));
    }

    #[tokio::test]
    async fn test_generated_keys_are_distinct_and_storable() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsAudioStore::new(dir.path().to_path_buf());

        let first = store.generate_key();
        let second = store.generate_key();
        assert_ne!(first, second);
        assert!(validate_handle(&first).is_ok());

        store.put(&first, vec![1]).await.unwrap();
        store.put(&second, vec![2]).await.unwrap();
        assert_eq!(store.get(&first).await.unwrap(), vec![1]);
        assert_eq!(store.get(&second).await.unwrap(), vec![2]);
    }
}
