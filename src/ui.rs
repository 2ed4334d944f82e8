use serde::Serialize;

use crate::suggest::SuggestionSet;

/// Visible state of the single activation control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    /// Ready for a new capture attempt
    Idle,
    /// Microphone is open
    Listening,
    /// Suggestions are being fetched
    Thinking,
}

impl Affordance {
    pub fn label(&self) -> &'static str {
        match self {
            Affordance::Idle => "🎤 탭하여 말하기",
            Affordance::Listening => "🟢 듣는 중...",
            Affordance::Thinking => "🤖 답변 생성 중...",
        }
    }
}

/// A user-facing message outside the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    /// Blocking notices require the user to act (e.g. grant microphone
    /// permission in platform settings) before another attempt can succeed.
    pub blocking: bool,
}

/// Events sent from the session controller to the frontend.
///
/// The controller only ever writes to the frontend; it never reads UI
/// state back. Session status flags are authoritative.
#[derive(Debug, Clone)]
pub enum UiEvent {
    Affordance(Affordance),
    /// Preview of the captured transcript while suggestions are fetched.
    Transcript(String),
    /// Transcript preview cleared (attempt resolved).
    TranscriptCleared,
    Suggestions(SuggestionSet),
    Notice(Notice),
}
