//! Speech controller — an explicit {idle, speaking, paused} state machine
//! over a pluggable synthesis engine.
//!
//! Playback runs as a cancellable background task bound to the controller.
//! Pause kills the in-flight utterance and keeps its text; resume restarts
//! the same text from the beginning — no mid-utterance position is tracked.
//!
//! `SpeechEngine` is enum dispatch like `llm::LlmProvider`; the Null backend
//! exists for tests and keyless deployments.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::SpeechConfig;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("unknown speech engine: {0}")]
    UnknownEngine(String),
    #[error("speech engine failed: {0}")]
    Engine(String),
}

// ── Engine backends ───────────────────────────────────────────────────────────

/// All available synthesis backends.
#[derive(Debug, Clone)]
pub enum SpeechEngine {
    Espeak(EspeakEngine),
    Null(NullEngine),
}

impl SpeechEngine {
    /// Construct an engine from config — called once at startup.
    pub fn build(config: &SpeechConfig) -> Result<Self, SpeechError> {
        match config.engine.as_str() {
            "espeak" => Ok(Self::Espeak(EspeakEngine)),
            "null" => Ok(Self::Null(NullEngine::default())),
            _ => Err(SpeechError::UnknownEngine(config.engine.clone())),
        }
    }

    /// Drive the engine through the full text, stopping early when the token
    /// is cancelled. Cancellation is not an error.
    pub async fn speak(&self, text: &str, cancel: CancellationToken) -> Result<(), SpeechError> {
        match self {
            Self::Espeak(e) => e.speak(text, cancel).await,
            Self::Null(e) => e.speak(text, cancel).await,
        }
    }
}

/// Local `espeak` subprocess backend. The child is killed on cancel.
#[derive(Debug, Clone)]
pub struct EspeakEngine;

impl EspeakEngine {
    async fn speak(&self, text: &str, cancel: CancellationToken) -> Result<(), SpeechError> {
        let mut child = tokio::process::Command::new("espeak")
            .arg(text)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::Engine(format!("cannot spawn espeak: {e}")))?;

        tokio::select! {
            status = child.wait() => match status {
                Ok(s) if s.success() => Ok(()),
                Ok(s) => Err(SpeechError::Engine(format!("espeak exited with {s}"))),
                Err(e) => Err(SpeechError::Engine(e.to_string())),
            },
            _ = cancel.cancelled() => {
                let _ = child.kill().await;
                Ok(())
            }
        }
    }
}

/// No-op backend that "speaks" by sleeping per character. The delay makes
/// pause/resume transitions observable in tests.
#[derive(Debug, Clone, Default)]
pub struct NullEngine {
    pub char_delay_ms: u64,
}

impl NullEngine {
    async fn speak(&self, text: &str, cancel: CancellationToken) -> Result<(), SpeechError> {
        let total = Duration::from_millis(self.char_delay_ms * text.chars().count() as u64);
        tokio::select! {
            _ = tokio::time::sleep(total) => Ok(()),
            _ = cancel.cancelled() => Ok(()),
        }
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Controller state, reported back to the UI after each action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechState {
    Idle,
    Speaking,
    Paused,
}

struct Inner {
    state: SpeechState,
    /// Text of the current (or paused) utterance.
    text: Option<String>,
    /// Cancels the in-flight engine task.
    cancel: Option<CancellationToken>,
    /// Bumped per utterance so a stale completion cannot clobber the state
    /// of a newer one.
    generation: u64,
}

pub struct SpeechController {
    engine: SpeechEngine,
    inner: Arc<Mutex<Inner>>,
}

impl SpeechController {
    pub fn new(engine: SpeechEngine) -> Self {
        Self {
            engine,
            inner: Arc::new(Mutex::new(Inner {
                state: SpeechState::Idle,
                text: None,
                cancel: None,
                generation: 0,
            })),
        }
    }

    pub fn state(&self) -> SpeechState {
        self.inner.lock().expect("speech state lock").state
    }

    /// Start speaking `text`. A no-op while paused; otherwise any in-flight
    /// utterance is cancelled and replaced. Must be called from within a
    /// tokio runtime.
    pub fn speak(&self, text: &str) -> SpeechState {
        let (token, generation) = {
            let mut inner = self.inner.lock().expect("speech state lock");
            if inner.state == SpeechState::Paused {
                return SpeechState::Paused;
            }
            if let Some(old) = inner.cancel.take() {
                old.cancel();
            }
            inner.generation += 1;
            let token = CancellationToken::new();
            inner.cancel = Some(token.clone());
            inner.text = Some(text.to_string());
            inner.state = SpeechState::Speaking;
            (token, inner.generation)
        };

        debug!(chars = text.chars().count(), "starting utterance");
        let engine = self.engine.clone();
        let shared = Arc::clone(&self.inner);
        let text = text.to_string();
        tokio::spawn(async move {
            if let Err(e) = engine.speak(&text, token.clone()).await {
                warn!("speech engine failed: {e}");
            }
            let mut inner = shared.lock().expect("speech state lock");
            // Only the utterance that is still current may return to idle;
            // a pause or a newer speak has already moved the state on.
            if inner.generation == generation && !token.is_cancelled() {
                inner.state = SpeechState::Idle;
                inner.cancel = None;
            }
        });

        SpeechState::Speaking
    }

    /// Stop the engine mid-utterance and remember the text. Only meaningful
    /// while speaking.
    pub fn pause(&self) -> SpeechState {
        let mut inner = self.inner.lock().expect("speech state lock");
        if inner.state == SpeechState::Speaking {
            if let Some(token) = inner.cancel.take() {
                token.cancel();
            }
            inner.state = SpeechState::Paused;
        }
        inner.state
    }

    /// Restart the paused utterance from the beginning. Only meaningful
    /// while paused.
    pub fn resume(&self) -> SpeechState {
        let text = {
            let mut inner = self.inner.lock().expect("speech state lock");
            if inner.state != SpeechState::Paused {
                return inner.state;
            }
            inner.state = SpeechState::Idle;
            inner.text.clone()
        };
        match text {
            Some(t) => self.speak(&t),
            None => SpeechState::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slow_controller() -> SpeechController {
        SpeechController::new(SpeechEngine::Null(NullEngine { char_delay_ms: 20 }))
    }

    fn fast_controller() -> SpeechController {
        SpeechController::new(SpeechEngine::Null(NullEngine { char_delay_ms: 0 }))
    }

    #[tokio::test]
    async fn starts_idle() {
        assert_eq!(slow_controller().state(), SpeechState::Idle);
    }

    #[tokio::test]
    async fn speak_then_natural_completion_returns_to_idle() {
        let c = fast_controller();
        assert_eq!(c.speak("hello"), SpeechState::Speaking);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(c.state(), SpeechState::Idle);
    }

    #[tokio::test]
    async fn pause_stops_mid_utterance() {
        let c = slow_controller();
        c.speak("a fairly long utterance to keep the engine busy");
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(c.pause(), SpeechState::Paused);
        // The cancelled task must not flip the state back to idle.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(c.state(), SpeechState::Paused);
    }

    #[tokio::test]
    async fn speak_while_paused_is_a_no_op() {
        let c = slow_controller();
        c.speak("first utterance with enough text");
        c.pause();

        assert_eq!(c.speak("second"), SpeechState::Paused);
        assert_eq!(c.state(), SpeechState::Paused);
    }

    #[tokio::test]
    async fn resume_restarts_same_text_from_start() {
        let c = slow_controller();
        c.speak("some text being read aloud");
        tokio::time::sleep(Duration::from_millis(30)).await;
        c.pause();

        assert_eq!(c.resume(), SpeechState::Speaking);
        // Resumed utterance runs to completion like a fresh one.
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(c.state(), SpeechState::Idle);
    }

    #[tokio::test]
    async fn pause_while_idle_stays_idle() {
        let c = slow_controller();
        assert_eq!(c.pause(), SpeechState::Idle);
    }

    #[tokio::test]
    async fn resume_while_idle_stays_idle() {
        let c = slow_controller();
        assert_eq!(c.resume(), SpeechState::Idle);
    }

    #[tokio::test]
    async fn new_speak_replaces_in_flight_utterance() {
        let c = slow_controller();
        c.speak("first utterance with plenty of characters");
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(c.speak("x"), SpeechState::Speaking);

        tokio::time::sleep(Duration::from_millis(100)).await;
        // The replacement finished; the cancelled first task must not have
        // left the state stuck.
        assert_eq!(c.state(), SpeechState::Idle);
    }
}
