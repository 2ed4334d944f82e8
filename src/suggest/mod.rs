//! Suggestion fetching
//!
//! Boundary to the remote suggestion service: one `POST` per recognized
//! transcript, bounded timeout, no retries. Every failure mode resolves
//! locally to a fixed substitute message set, so callers never handle an
//! error.

pub mod client;
pub mod fallback;
mod set;

pub use client::{extract_suggestions, HttpSuggestionClient, SuggestError, SuggestionSource};
pub use fallback::{fallback_set, FallbackKind};
pub use set::{SuggestionOrigin, SuggestionSet};
