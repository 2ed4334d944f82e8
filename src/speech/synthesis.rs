use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::SynthesisConfig;

/// Speech-synthesis boundary.
///
/// Fire-and-forget: `speak` cancels whatever is currently playing, requests
/// synthesis of the new text and returns. Playback has no ordering
/// guarantee relative to recognition state.
#[async_trait::async_trait]
pub trait Synthesizer: Send + Sync {
    async fn speak(&self, text: &str);
}

/// Discards utterances (headless runs, playback disabled).
pub struct NullSynthesizer;

#[async_trait::async_trait]
impl Synthesizer for NullSynthesizer {
    async fn speak(&self, text: &str) {
        debug!("playback disabled, dropping utterance: {}", text);
    }
}

/// Speaks through an external TTS command (espeak-style flags), one child
/// process per utterance. Starting a new utterance kills the previous one.
pub struct ProcessSynthesizer {
    command: String,
    config: SynthesisConfig,
    current: Mutex<Option<Child>>,
}

impl ProcessSynthesizer {
    /// Returns `None` when no synthesis command is configured.
    pub fn from_config(config: &SynthesisConfig) -> Option<Self> {
        config.command.clone().map(|command| Self {
            command,
            config: config.clone(),
            current: Mutex::new(None),
        })
    }

    /// espeak units: speed in words/minute (175 = default), pitch 0-99
    /// (50 = default), amplitude 0-200 (100 = default).
    fn engine_args(&self) -> [String; 4] {
        let speed = (175.0 * self.config.rate).round().max(80.0) as u32;
        let pitch = (50.0 * self.config.pitch).round().clamp(0.0, 99.0) as u32;
        let amplitude = (100.0 * self.config.volume).round().clamp(0.0, 200.0) as u32;
        [
            format!("-v{}", self.config.locale),
            format!("-s{}", speed),
            format!("-p{}", pitch),
            format!("-a{}", amplitude),
        ]
    }
}

#[async_trait::async_trait]
impl Synthesizer for ProcessSynthesizer {
    async fn speak(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let mut current = self.current.lock().await;

        // Cancel the in-flight utterance before starting the new one.
        if let Some(mut child) = current.take() {
            if let Err(e) = child.start_kill() {
                debug!("could not cancel previous utterance: {}", e);
            }
        }

        let spawned = Command::new(&self.command)
            .args(self.engine_args())
            .arg(text)
            .kill_on_drop(true)
            .spawn();

        match spawned {
            Ok(child) => {
                debug!("speaking: {}", text);
                *current = Some(child);
            }
            Err(e) => warn!("synthesis command {:?} failed to start: {}", self.command, e),
        }
    }
}
