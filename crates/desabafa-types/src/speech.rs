//! Speech synthesis and transcription types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MIME type of synthesized audio.
pub const SYNTHESIZED_AUDIO_MIME: &str = "audio/mpeg";

/// Synthesis voice selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Alloy,
    Echo,
    Fable,
    Onyx,
    #[default]
    Nova,
    Shimmer,
}

impl Voice {
    pub const ALL: [Voice; 6] = [
        Voice::Alloy,
        Voice::Echo,
        Voice::Fable,
        Voice::Onyx,
        Voice::Nova,
        Voice::Shimmer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Shimmer => "shimmer",
        }
    }

    /// Short pt-BR description shown to end users.
    pub fn description(&self) -> &'static str {
        match self {
            Voice::Alloy => "Voz neutra e clara",
            Voice::Echo => "Voz masculina",
            Voice::Fable => "Voz feminina suave",
            Voice::Onyx => "Voz masculina profunda",
            Voice::Nova => "Voz feminina natural (recomendada)",
            Voice::Shimmer => "Voz feminina energética",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Voice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Voice::ALL
            .into_iter()
            .find(|v| v.as_str() == lower)
            .ok_or_else(|| format!("invalid voice: '{s}'"))
    }
}

/// Listing entry for the voice catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub id: Voice,
    pub description: String,
    pub is_default: bool,
}

/// Request for text-to-speech.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub model: String,
    pub text: String,
    pub voice: Voice,
    pub speed: f32,
}

/// Request for speech-to-text.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    pub model: String,
    pub audio: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
    pub language: Option<String>,
}

/// Synthesized audio artifact.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesizedAudio {
    pub handle: String,
    pub url: String,
    pub voice: Voice,
    pub text: String,
}

/// Errors from speech provider operations.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited")]
    RateLimited,

    #[error("invalid audio: {0}")]
    InvalidAudio(String),

    #[error("malformed provider response: {0}")]
    Deserialization(String),

    #[error("request timed out")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_default_is_nova() {
        assert_eq!(Voice::default(), Voice::Nova);
    }

    #[test]
    fn test_voice_roundtrip() {
        for voice in Voice::ALL {
            let parsed: Voice = voice.to_string().parse().unwrap();
            assert_eq!(voice, parsed);
        }
        assert_eq!("NOVA".parse::<Voice>().unwrap(), Voice::Nova);
        assert!("baritone".parse::<Voice>().is_err());
    }

    #[test]
    fn test_voice_serde() {
        assert_eq!(serde_json::to_string(&Voice::Shimmer).unwrap(), "\"shimmer\"");
    }
}
