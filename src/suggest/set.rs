use serde::Serialize;

use super::fallback::FallbackKind;

/// Where a rendered suggestion set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionOrigin {
    /// Parsed from a suggestion-service response
    Backend,
    /// Fixed substitute messages for a failure kind
    Fallback(FallbackKind),
}

/// An ordered set of display strings ready to render.
///
/// Items are non-empty; each one is independently speakable. Rendering or
/// speaking an item never mutates the set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionSet {
    pub items: Vec<String>,
    pub origin: SuggestionOrigin,
}

impl SuggestionSet {
    pub fn backend(items: Vec<String>) -> Self {
        Self {
            items,
            origin: SuggestionOrigin::Backend,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, SuggestionOrigin::Fallback(_))
    }
}
