use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use super::recognizer::{
    Alternative, CapabilityError, Recognizer, RecognizerEvent, RecognizerFactory,
    RecognizerOptions,
};

/// One step of a scripted capture: wait `after`, then emit `event`.
#[derive(Debug, Clone)]
pub struct ScriptedStep {
    pub after: Duration,
    pub event: RecognizerEvent,
}

impl ScriptedStep {
    pub fn immediate(event: RecognizerEvent) -> Self {
        Self {
            after: Duration::ZERO,
            event,
        }
    }

    pub fn delayed(after: Duration, event: RecognizerEvent) -> Self {
        Self { after, event }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Run,
    Stop,
    Abort,
}

/// What the script does with its pending events on a graceful stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopBehavior {
    /// Conclude with `End`; pending events are dropped
    End,
    /// Deliver pending events immediately, then close the stream
    Flush,
}

/// Deterministic recognizer that plays back a fixed event script.
///
/// Used by tests and the CLI demo in place of a platform engine. Graceful
/// `stop()` makes the script emit `End` (a platform recognizer finishing
/// capture); `abort()` silences it without any further event.
pub struct ScriptedRecognizer {
    script: Vec<ScriptedStep>,
    signal: Option<watch::Sender<Signal>>,
    on_stop: StopBehavior,
    stop_fails: bool,
}

impl ScriptedRecognizer {
    pub fn new(script: Vec<ScriptedStep>) -> Self {
        Self {
            script,
            signal: None,
            on_stop: StopBehavior::End,
            stop_fails: false,
        }
    }

    /// Script that delivers one final result with a single alternative.
    pub fn with_result(transcript: &str, confidence: Option<f32>) -> Self {
        Self::new(vec![ScriptedStep::immediate(RecognizerEvent::Result(vec![
            Alternative::new(transcript, confidence),
        ]))])
    }

    /// Deliver pending scripted events at once when stopped gracefully,
    /// modeling an engine whose in-flight result still arrives after
    /// `stop()` returns.
    pub fn flush_on_stop(mut self) -> Self {
        self.on_stop = StopBehavior::Flush;
        self
    }

    /// Make graceful stop fail, leaving the script running.
    pub fn fail_on_stop(mut self) -> Self {
        self.stop_fails = true;
        self
    }
}

#[async_trait::async_trait]
impl Recognizer for ScriptedRecognizer {
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognizerEvent>> {
        let (tx, rx) = mpsc::channel(4);
        let (signal_tx, mut signal_rx) = watch::channel(Signal::Run);
        self.signal = Some(signal_tx);

        let script = std::mem::take(&mut self.script);
        let on_stop = self.on_stop;
        tokio::spawn(async move {
            let mut steps = script.into_iter();
            while let Some(step) = steps.next() {
                tokio::select! {
                    _ = tokio::time::sleep(step.after) => {
                        if tx.send(step.event).await.is_err() {
                            return;
                        }
                    }
                    _ = signal_rx.changed() => {
                        let signal = *signal_rx.borrow();
                        debug!("scripted capture interrupted: {:?}", signal);
                        if signal == Signal::Stop {
                            match on_stop {
                                StopBehavior::End => {
                                    let _ = tx.send(RecognizerEvent::End).await;
                                }
                                StopBehavior::Flush => {
                                    let _ = tx.send(step.event).await;
                                    for pending in steps.by_ref() {
                                        let _ = tx.send(pending.event).await;
                                    }
                                }
                            }
                        }
                        return;
                    }
                }
            }
            // Script exhausted: dropping the sender closes the event stream,
            // which the controller treats as an end without a result.
        });

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if self.stop_fails {
            anyhow::bail!("scripted capture rejected the stop request");
        }
        if let Some(signal) = &self.signal {
            let _ = signal.send(Signal::Stop);
        }
        Ok(())
    }

    fn abort(&mut self) {
        if let Some(signal) = &self.signal {
            let _ = signal.send(Signal::Abort);
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Hands out pre-built scripted recognizers in order and counts creations,
/// so tests can assert that a busy controller constructs no new recognizer.
pub struct ScriptedRecognizerFactory {
    queue: Mutex<VecDeque<ScriptedRecognizer>>,
    created: AtomicUsize,
}

impl ScriptedRecognizerFactory {
    pub fn new(recognizers: Vec<ScriptedRecognizer>) -> Self {
        Self {
            queue: Mutex::new(recognizers.into()),
            created: AtomicUsize::new(0),
        }
    }

    /// Number of recognizers created so far
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl RecognizerFactory for ScriptedRecognizerFactory {
    fn create(&self, _opts: &RecognizerOptions) -> Result<Box<dyn Recognizer>, CapabilityError> {
        let mut queue = self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match queue.pop_front() {
            Some(recognizer) => {
                self.created.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(recognizer))
            }
            None => Err(CapabilityError::new("scripted capture exhausted")),
        }
    }
}
