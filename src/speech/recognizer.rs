use anyhow::Result;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::RecognitionConfig;

/// One candidate transcript offered by the recognizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternative {
    /// Recognized text (not yet trimmed; the controller trims)
    pub transcript: String,
    /// Recognizer-reported certainty in [0, 1], when the engine provides one
    pub confidence: Option<f32>,
}

impl Alternative {
    /// Engines occasionally report garbage scores; normalize here so the
    /// controller only ever sees `None` or a value in [0, 1].
    pub fn new(transcript: impl Into<String>, confidence: Option<f32>) -> Self {
        let confidence = confidence
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, 1.0));
        Self {
            transcript: transcript.into(),
            confidence,
        }
    }
}

/// Events delivered by a capture attempt.
///
/// Within one session at most one of `Result`/`Error` fires; `End` (or
/// closure of the event channel) marks the recognizer finishing without a
/// result.
#[derive(Debug, Clone)]
pub enum RecognizerEvent {
    /// Final, non-interim result with one or more alternatives
    Result(Vec<Alternative>),
    Error(RecognizerError),
    /// Capture finished without delivering a result
    End,
}

/// Platform error codes, mapped at the boundary to a closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognizerError {
    #[error("microphone permission denied")]
    PermissionDenied,
    #[error("no speech detected")]
    NoSpeech,
    #[error("capture device unavailable")]
    CaptureUnavailable,
    #[error("recognition service unreachable")]
    Network,
    #[error("recognition failed: {0}")]
    Other(String),
}

/// The platform offers no usable speech-recognition capability.
#[derive(Debug, Clone, Error)]
#[error("speech recognition unavailable: {reason}")]
pub struct CapabilityError {
    pub reason: String,
}

impl CapabilityError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Capture options for one session: single-utterance, final-results-only,
/// one locale.
#[derive(Debug, Clone)]
pub struct RecognizerOptions {
    pub locale: String,
    /// Upper bound on alternatives per result (1 disables confidence
    /// comparison)
    pub max_alternatives: u8,
}

impl From<&RecognitionConfig> for RecognizerOptions {
    fn from(cfg: &RecognitionConfig) -> Self {
        Self {
            locale: cfg.locale.clone(),
            max_alternatives: cfg.max_alternatives.max(1),
        }
    }
}

/// Speech-capture backend trait
///
/// One instance per capture attempt; the controller constructs a fresh
/// recognizer on every `start()` and releases it on every exit path.
#[async_trait::async_trait]
pub trait Recognizer: Send + Sync {
    /// Begin capturing one utterance.
    ///
    /// Returns a channel receiver for the attempt's events.
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognizerEvent>>;

    /// Ask capture to finish gracefully; an in-flight result may still be
    /// delivered afterwards.
    async fn stop(&mut self) -> Result<()>;

    /// Cancel immediately. Best-effort: errors are swallowed and no further
    /// events are delivered.
    fn abort(&mut self);

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Creates one recognizer per capture attempt.
///
/// `create` doubles as the capability check: an `Err` means the platform
/// cannot capture speech at all and no session is created.
pub trait RecognizerFactory: Send + Sync {
    fn create(&self, opts: &RecognizerOptions) -> Result<Box<dyn Recognizer>, CapabilityError>;
}

/// Factory for the platform's native speech engine.
///
/// No engine is bound in this build, so creation reports the capability as
/// unsupported; frontends surface that as a user-visible notice.
pub struct NativeRecognizerFactory;

impl RecognizerFactory for NativeRecognizerFactory {
    fn create(&self, _opts: &RecognizerOptions) -> Result<Box<dyn Recognizer>, CapabilityError> {
        Err(CapabilityError::new(
            "no native speech engine is available on this platform",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_confidence_is_kept_as_reported() {
        assert_eq!(Alternative::new("안녕", Some(0.42)).confidence, Some(0.42));
        assert_eq!(Alternative::new("안녕", None).confidence, None);
    }

    #[test]
    fn out_of_range_confidence_is_clamped() {
        assert_eq!(Alternative::new("안녕", Some(7.3)).confidence, Some(1.0));
        assert_eq!(Alternative::new("안녕", Some(-0.5)).confidence, Some(0.0));
    }

    #[test]
    fn non_finite_confidence_counts_as_unreported() {
        assert!(Alternative::new("안녕", Some(f32::NAN)).confidence.is_none());
        assert!(Alternative::new("안녕", Some(f32::INFINITY))
            .confidence
            .is_none());
    }
}
