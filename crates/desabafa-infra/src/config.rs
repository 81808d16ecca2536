//! Configuration loader for Desabafa.
//!
//! Reads `config.toml` from the data directory (`~/.desabafa/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed. The API key never comes from the file; it is
//! read from `OPENAI_API_KEY`.

use std::path::{Path, PathBuf};

use desabafa_types::config::AppConfig;
use secrecy::SecretString;

pub const DATA_DIR_ENV: &str = "DESABAFA_DATA_DIR";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `DESABAFA_DATA_DIR` environment variable
/// 2. `~/.desabafa`
/// 3. `.desabafa` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".desabafa");
    }

    PathBuf::from(".desabafa")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Audio directory: `audio_dir` as-is when absolute, else under `data_dir`.
pub fn resolve_audio_dir(config: &AppConfig, data_dir: &Path) -> PathBuf {
    let dir = Path::new(&config.audio_dir);
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        data_dir.join(dir)
    }
}

/// Read the provider API key from `OPENAI_API_KEY`.
///
/// Returns `None` when the variable is unset or blank; the server still
/// starts and generation or speech calls fail with an upstream error.
pub fn api_key_from_env() -> Option<SecretString> {
    parse_api_key(std::env::var(API_KEY_ENV).ok())
}

fn parse_api_key(raw: Option<String>) -> Option<SecretString> {
    raw.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .map(SecretString::from)
}
