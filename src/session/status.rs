use serde::Serialize;

/// Lifecycle phase of the single outstanding capture attempt.
///
/// At most one attempt is `Listening` or `AwaitingSuggestions` at any time;
/// every attempt terminates back in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    /// Microphone open, waiting for the recognizer to conclude
    Listening,
    /// Transcript captured, suggestion request in flight
    AwaitingSuggestions,
    /// A chosen suggestion is being dispatched to the synthesizer
    Speaking,
}

impl SessionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Listening => "listening",
            SessionStatus::AwaitingSuggestions => "awaiting_suggestions",
            SessionStatus::Speaking => "speaking",
        }
    }
}
