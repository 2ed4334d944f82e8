pub mod config;
pub mod session;
pub mod speech;
pub mod suggest;
pub mod ui;

pub use config::{Config, RecognitionConfig, SuggestionConfig, SynthesisConfig};
pub use session::{SessionController, SessionStatus, StartOutcome};
pub use speech::{
    Alternative, CapabilityError, NativeRecognizerFactory, NullSynthesizer, ProcessSynthesizer,
    Recognizer, RecognizerError, RecognizerEvent, RecognizerFactory, RecognizerOptions,
    ScriptedRecognizer, ScriptedRecognizerFactory, ScriptedStep, Synthesizer,
};
pub use suggest::{
    extract_suggestions, fallback_set, FallbackKind, HttpSuggestionClient, SuggestError,
    SuggestionOrigin, SuggestionSet, SuggestionSource,
};
pub use ui::{Affordance, Notice, UiEvent};
