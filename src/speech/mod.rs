//! Capability-provider boundaries for speech
//!
//! The platform's recognition and synthesis engines are opaque
//! collaborators. This module defines the traits the session controller
//! drives them through:
//! - `Recognizer` / `RecognizerFactory`: one capture attempt per instance
//! - `Synthesizer`: fire-and-forget utterance playback
//! - `ScriptedRecognizer`: deterministic backend for tests and demos

pub mod recognizer;
pub mod scripted;
pub mod synthesis;

pub use recognizer::{
    Alternative, CapabilityError, NativeRecognizerFactory, Recognizer, RecognizerError,
    RecognizerEvent, RecognizerFactory, RecognizerOptions,
};
pub use scripted::{ScriptedRecognizer, ScriptedRecognizerFactory, ScriptedStep};
pub use synthesis::{NullSynthesizer, ProcessSynthesizer, Synthesizer};
