use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration.
///
/// Every field has a default so the application runs without a config file;
/// a file (TOML/YAML/JSON, resolved by the `config` crate) overrides
/// individual sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub recognition: RecognitionConfig,
    pub suggestion: SuggestionConfig,
    pub synthesis: SynthesisConfig,
}

/// Speech-capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// BCP-47 locale for capture (single language per session)
    pub locale: String,

    /// Seconds of listening before the controller asks the recognizer to
    /// stop gracefully. Canonical value: 5 (upstream variants used 3-7).
    pub auto_stop_secs: u64,

    /// Transcripts below this reported confidence are rejected with a
    /// "please repeat" prompt instead of being sent to the backend.
    pub min_confidence: f32,

    /// How many alternatives to request from the recognizer
    pub max_alternatives: u8,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            locale: "ko-KR".to_string(),
            auto_stop_secs: 5,
            min_confidence: 0.3,
            max_alternatives: 3,
        }
    }
}

impl RecognitionConfig {
    pub fn auto_stop(&self) -> Duration {
        Duration::from_secs(self.auto_stop_secs)
    }
}

/// Suggestion-service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Endpoint receiving `POST {"text": ..., "userId": ...}`
    pub url: String,

    /// Request timeout in seconds. One request per capture, no retries.
    pub timeout_secs: u64,

    /// Stable user identifier sent with each request. Generated per run
    /// when absent.
    pub user_id: Option<String>,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            url: "https://voice-assist-backend.onrender.com/ask-gpt".to_string(),
            timeout_secs: 15,
            user_id: None,
        }
    }
}

impl SuggestionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Speech-synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// External TTS command (e.g. "espeak-ng" or "say"). `None` disables
    /// playback.
    pub command: Option<String>,

    /// Locale passed to the synthesizer
    pub locale: String,

    /// Speaking rate multiplier (1.0 = engine default)
    pub rate: f32,

    /// Pitch multiplier (1.0 = engine default)
    pub pitch: f32,

    /// Volume in [0.0, 1.0]
    pub volume: f32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            command: None,
            locale: "ko-KR".to_string(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

impl Config {
    /// Load configuration, layering an optional file over built-in defaults.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        let mut cfg: Config = settings.try_deserialize()?;
        cfg.recognition.min_confidence = cfg.recognition.min_confidence.clamp(0.0, 1.0);
        Ok(cfg)
    }
}
