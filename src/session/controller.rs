use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::RecognitionConfig;
use crate::speech::{
    Alternative, Recognizer, RecognizerError, RecognizerEvent, RecognizerFactory,
    RecognizerOptions, Synthesizer,
};
use crate::suggest::{fallback_set, FallbackKind, SuggestionSet, SuggestionSource};
use crate::ui::{Affordance, Notice, UiEvent};

use super::status::SessionStatus;

/// Outcome of a `start()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new capture attempt is listening
    Started,
    /// Another attempt is active; the request was ignored (no queuing)
    Busy,
    /// The platform cannot capture speech; a blocking notice was rendered
    Unsupported,
    /// The recognizer failed to start; resources were released
    Failed,
}

/// One outstanding capture attempt and the resources it owns.
///
/// The recognizer slot is empty while the auto-stop task has borrowed it
/// for a graceful stop; see [`SessionController::auto_stop`].
struct ActiveSession {
    recognizer: Option<Box<dyn Recognizer>>,
    auto_stop: JoinHandle<()>,
    started_at: DateTime<Utc>,
}

impl ActiveSession {
    /// Release both owned handles. Every exit path funnels through here.
    fn release(&mut self) {
        self.auto_stop.abort();
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.abort();
        }
    }

    fn elapsed(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

struct Inner {
    status: SessionStatus,
    session: Option<ActiveSession>,
    /// Bumped whenever a session is created or invalidated, so late
    /// callbacks from a superseded recognizer cannot corrupt state.
    epoch: u64,
}

/// Owns the lifecycle of one speech-capture attempt: start, auto-stop,
/// result, error and termination, then the handoff of a recognized
/// transcript to the suggestion fetch and the rendered result list.
///
/// Cheap to clone; all clones share one session slot.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Mutex<Inner>>,
    recognizers: Arc<dyn RecognizerFactory>,
    suggestions: Arc<dyn SuggestionSource>,
    synthesizer: Arc<dyn Synthesizer>,
    ui: mpsc::UnboundedSender<UiEvent>,
    config: RecognitionConfig,
}

impl SessionController {
    /// Create a controller and the receiver a frontend drains for UI events.
    pub fn new(
        config: RecognitionConfig,
        recognizers: Arc<dyn RecognizerFactory>,
        suggestions: Arc<dyn SuggestionSource>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (ui, ui_rx) = mpsc::unbounded_channel();
        let controller = Self {
            inner: Arc::new(Mutex::new(Inner {
                status: SessionStatus::Idle,
                session: None,
                epoch: 0,
            })),
            recognizers,
            suggestions,
            synthesizer,
            ui,
            config,
        };
        (controller, ui_rx)
    }

    pub async fn status(&self) -> SessionStatus {
        self.inner.lock().await.status
    }

    /// Begin one capture attempt.
    ///
    /// Only allowed from `Idle`; any other status makes this a logged no-op
    /// with no recognizer construction and no UI change.
    pub async fn start(&self) -> StartOutcome {
        let mut inner = self.inner.lock().await;
        if inner.status != SessionStatus::Idle {
            debug!("start ignored: session is {}", inner.status.label());
            return StartOutcome::Busy;
        }

        // A stale handle can linger if a driver task died mid-transition.
        if let Some(mut stale) = inner.session.take() {
            warn!("releasing stale recognizer handle");
            stale.release();
        }

        let opts = RecognizerOptions::from(&self.config);
        let mut recognizer = match self.recognizers.create(&opts) {
            Ok(recognizer) => recognizer,
            Err(e) => {
                warn!("{}", e);
                self.emit(UiEvent::Notice(Notice {
                    text: "이 환경에서는 음성 인식을 지원하지 않습니다.".to_string(),
                    blocking: true,
                }));
                return StartOutcome::Unsupported;
            }
        };

        info!(
            "starting capture: backend={} locale={}",
            recognizer.name(),
            opts.locale
        );

        let events = match recognizer.start().await {
            Ok(events) => events,
            Err(e) => {
                error!("recognizer failed to start: {:#}", e);
                recognizer.abort();
                self.emit(UiEvent::Notice(Notice {
                    text: "음성 인식을 시작하지 못했습니다. 다시 시도해 주세요.".to_string(),
                    blocking: false,
                }));
                return StartOutcome::Failed;
            }
        };

        inner.epoch = inner.epoch.wrapping_add(1);
        let epoch = inner.epoch;

        let auto_stop = tokio::spawn({
            let controller = self.clone();
            let wait = self.config.auto_stop();
            async move {
                controller.auto_stop(epoch, wait).await;
            }
        });

        inner.session = Some(ActiveSession {
            recognizer: Some(recognizer),
            auto_stop,
            started_at: Utc::now(),
        });
        inner.status = SessionStatus::Listening;
        drop(inner);

        self.emit(UiEvent::Affordance(Affordance::Listening));

        tokio::spawn({
            let controller = self.clone();
            async move {
                controller.drive(epoch, events).await;
            }
        });

        StartOutcome::Started
    }

    /// Forced teardown (stop control, frontend shutdown, visibility loss).
    ///
    /// Hard-aborts any active recognizer, cancels the timer and returns to
    /// idle. Idempotent; safe to call from any state, including `Idle`.
    pub async fn teardown(&self) {
        let mut inner = self.inner.lock().await;
        inner.epoch = inner.epoch.wrapping_add(1);
        let was_idle = inner.status == SessionStatus::Idle;
        if let Some(mut session) = inner.session.take() {
            info!("tearing down capture after {:?}", session.elapsed());
            session.release();
        }
        inner.status = SessionStatus::Idle;
        drop(inner);

        if !was_idle {
            self.emit(UiEvent::TranscriptCleared);
        }
        self.emit(UiEvent::Affordance(Affordance::Idle));
    }

    /// Speak one suggestion aloud.
    ///
    /// Fire-and-forget: cancels whatever is currently playing, never blocks
    /// recognition transitions and never mutates the rendered set.
    pub async fn speak(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        {
            let mut inner = self.inner.lock().await;
            if inner.status == SessionStatus::Idle {
                inner.status = SessionStatus::Speaking;
            }
        }

        self.synthesizer.speak(text).await;

        let mut inner = self.inner.lock().await;
        if inner.status == SessionStatus::Speaking {
            inner.status = SessionStatus::Idle;
        }
    }

    /// Consume the capture attempt's event stream.
    ///
    /// At most one terminal event is honored; closure of the stream without
    /// one counts as an end without a result.
    async fn drive(&self, epoch: u64, mut events: mpsc::Receiver<RecognizerEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                RecognizerEvent::Result(alternatives) => {
                    self.on_result(epoch, alternatives).await;
                    return;
                }
                RecognizerEvent::Error(e) => {
                    self.on_error(epoch, e).await;
                    return;
                }
                RecognizerEvent::End => {
                    self.on_end(epoch).await;
                    return;
                }
            }
        }
        self.on_end(epoch).await;
    }

    async fn on_result(&self, epoch: u64, alternatives: Vec<Alternative>) {
        let Some(best) = best_alternative(alternatives) else {
            self.on_end(epoch).await;
            return;
        };

        let transcript = best.transcript.trim().to_string();
        if transcript.is_empty() {
            self.on_end(epoch).await;
            return;
        }

        if let Some(confidence) = best.confidence {
            if confidence < self.config.min_confidence {
                info!(
                    "rejecting low-confidence transcript ({:.2} < {:.2})",
                    confidence, self.config.min_confidence
                );
                self.finish(epoch, Some(fallback_set(FallbackKind::LowConfidence)))
                    .await;
                return;
            }
        }

        // Capture is over; release the recognizer and timer before the
        // network round-trip so nothing dangles across it.
        {
            let mut inner = self.inner.lock().await;
            if inner.epoch != epoch || inner.status != SessionStatus::Listening {
                debug!("dropping result from superseded session");
                return;
            }
            if let Some(mut session) = inner.session.take() {
                session.release();
            }
            inner.status = SessionStatus::AwaitingSuggestions;
        }

        info!("recognized: {:?}", transcript);
        self.emit(UiEvent::Affordance(Affordance::Thinking));
        self.emit(UiEvent::Transcript(transcript.clone()));

        let set = self.suggestions.suggest(&transcript).await;
        self.finish(epoch, Some(set)).await;
    }

    async fn on_error(&self, epoch: u64, error: RecognizerError) {
        {
            let inner = self.inner.lock().await;
            if inner.epoch != epoch {
                debug!("dropping error from superseded session: {}", error);
                return;
            }
        }

        warn!("recognizer error: {}", error);
        let (kind, hint) = error_outcome(&error);
        if let Some(hint) = hint {
            self.emit(UiEvent::Notice(hint));
        }
        self.finish(epoch, Some(fallback_set(kind))).await;
    }

    /// The recognizer concluded without a result or an error: nothing was
    /// said. Meaningless once capture has already moved on.
    async fn on_end(&self, epoch: u64) {
        {
            let inner = self.inner.lock().await;
            if inner.epoch != epoch || inner.status != SessionStatus::Listening {
                return;
            }
        }

        info!("capture ended without speech");
        self.finish(epoch, Some(fallback_set(FallbackKind::NoSpeech)))
            .await;
    }

    /// Render an outcome and return the attempt to idle. No-op when the
    /// attempt has been superseded or torn down in the meantime.
    async fn finish(&self, epoch: u64, outcome: Option<SuggestionSet>) {
        {
            let mut inner = self.inner.lock().await;
            if inner.epoch != epoch {
                debug!("dropping outcome from superseded session");
                return;
            }
            if let Some(mut session) = inner.session.take() {
                debug!("attempt finished after {:?}", session.elapsed());
                session.release();
            }
            inner.status = SessionStatus::Idle;
        }

        if let Some(set) = outcome {
            self.emit(UiEvent::Suggestions(set));
        }
        self.emit(UiEvent::TranscriptCleared);
        self.emit(UiEvent::Affordance(Affordance::Idle));
    }

    /// Auto-stop policy: after the listening window elapses, ask the
    /// recognizer to stop gracefully so a trailing result can still arrive.
    /// Only a failing `stop()` forces an immediate release.
    ///
    /// The recognizer is taken out of the session slot while `stop()` is
    /// awaited: a backend whose stop waits on event delivery must not hold
    /// the state lock that the event handlers need.
    async fn auto_stop(&self, epoch: u64, wait: Duration) {
        tokio::time::sleep(wait).await;

        let mut recognizer = {
            let mut inner = self.inner.lock().await;
            if inner.epoch != epoch || inner.status != SessionStatus::Listening {
                return;
            }
            let Some(recognizer) = inner.session.as_mut().and_then(|s| s.recognizer.take())
            else {
                return;
            };
            recognizer
        };

        info!("listening window elapsed, stopping capture");
        let stopped = recognizer.stop().await;

        let mut inner = self.inner.lock().await;
        if inner.epoch != epoch {
            // Torn down while stopping; nothing to hand back.
            recognizer.abort();
            return;
        }

        match stopped {
            Ok(()) => match inner.session.as_mut() {
                Some(session) => session.recognizer = Some(recognizer),
                // The trailing result already resolved the attempt.
                None => recognizer.abort(),
            },
            Err(e) => {
                error!("graceful stop failed: {:#}", e);
                recognizer.abort();
                if let Some(mut session) = inner.session.take() {
                    session.release();
                }
                inner.status = SessionStatus::Idle;
                inner.epoch = inner.epoch.wrapping_add(1);
                drop(inner);
                self.emit(UiEvent::TranscriptCleared);
                self.emit(UiEvent::Affordance(Affordance::Idle));
            }
        }
    }

    fn emit(&self, event: UiEvent) {
        // A dropped receiver means the frontend is gone; nothing to update.
        let _ = self.ui.send(event);
    }
}

/// Highest reported confidence wins; ties and unreported confidences keep
/// the earliest offering.
fn best_alternative(alternatives: Vec<Alternative>) -> Option<Alternative> {
    let mut best: Option<Alternative> = None;
    for alt in alternatives {
        let replace = match &best {
            None => true,
            Some(current) => {
                alt.confidence.unwrap_or(-1.0) > current.confidence.unwrap_or(-1.0)
            }
        };
        if replace {
            best = Some(alt);
        }
    }
    best
}

/// Map a recognizer error to its rendered message set, plus the blocking
/// settings hint where the user has to act outside the app.
fn error_outcome(error: &RecognizerError) -> (FallbackKind, Option<Notice>) {
    match error {
        RecognizerError::PermissionDenied => (
            FallbackKind::PermissionDenied,
            Some(Notice {
                text: "시스템 설정에서 마이크 권한을 허용해 주세요.".to_string(),
                blocking: true,
            }),
        ),
        RecognizerError::CaptureUnavailable => (
            FallbackKind::CaptureUnavailable,
            Some(Notice {
                text: "마이크 연결 상태를 확인해 주세요.".to_string(),
                blocking: true,
            }),
        ),
        RecognizerError::NoSpeech => (FallbackKind::NoSpeech, None),
        RecognizerError::Network => (FallbackKind::RecognizerNetwork, None),
        RecognizerError::Other(_) => (FallbackKind::RecognizerFailed, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_alternative_prefers_highest_confidence() {
        let best = best_alternative(vec![
            Alternative::new("낮음", Some(0.4)),
            Alternative::new("높음", Some(0.9)),
            Alternative::new("중간", Some(0.6)),
        ])
        .unwrap();
        assert_eq!(best.transcript, "높음");
    }

    #[test]
    fn best_alternative_tie_breaks_on_first_offered() {
        let best = best_alternative(vec![
            Alternative::new("첫째", Some(0.5)),
            Alternative::new("둘째", Some(0.5)),
        ])
        .unwrap();
        assert_eq!(best.transcript, "첫째");
    }

    #[test]
    fn best_alternative_without_confidence_keeps_first() {
        let best = best_alternative(vec![
            Alternative::new("하나", None),
            Alternative::new("둘", None),
        ])
        .unwrap();
        assert_eq!(best.transcript, "하나");
    }

    #[test]
    fn best_alternative_of_empty_is_none() {
        assert!(best_alternative(Vec::new()).is_none());
    }

    #[test]
    fn permission_denied_gets_blocking_hint() {
        let (kind, hint) = error_outcome(&RecognizerError::PermissionDenied);
        assert_eq!(kind, FallbackKind::PermissionDenied);
        assert!(hint.unwrap().blocking);
    }

    #[test]
    fn network_error_has_no_hint() {
        let (kind, hint) = error_outcome(&RecognizerError::Network);
        assert_eq!(kind, FallbackKind::RecognizerNetwork);
        assert!(hint.is_none());
    }
}
