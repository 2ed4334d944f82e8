//! Recognition-session lifecycle
//!
//! This module provides the `SessionController` that owns:
//! - The single outstanding capture attempt (at most one at a time)
//! - The recognizer handle and the auto-stop timer for that attempt
//! - Transitions through listening, suggestion fetch and back to idle
//! - Defense against late callbacks from superseded recognizers

mod controller;
mod status;

pub use controller::{SessionController, StartOutcome};
pub use status::SessionStatus;
