use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::reviews::effects::{ClipboardWriter, ExternalNavigator, SideEffectError};
use crate::reviews::profile::{BusinessProfile, ProfileParams};
use crate::reviews::prompt::ReviewPrompt;
use crate::reviews::strategy::{ReviewSource, ReviewStrategy, StrategyFailure, StrategyOutcome};
use crate::reviews::synthesizer::{FallbackReviewSynthesizer, SequenceRandom};

pub(super) struct ScriptedStrategy {
    source: ReviewSource,
    outcome: StrategyOutcome,
    calls: Arc<AtomicUsize>,
}

impl ScriptedStrategy {
    pub(super) fn succeeding(source: ReviewSource, text: &str) -> (Self, Arc<AtomicUsize>) {
        Self::with_outcome(source, StrategyOutcome::Success(text.to_string()))
    }

    pub(super) fn failing(source: ReviewSource, failure: StrategyFailure) -> (Self, Arc<AtomicUsize>) {
        Self::with_outcome(source, StrategyOutcome::Failure(failure))
    }

    fn with_outcome(source: ReviewSource, outcome: StrategyOutcome) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                source,
                outcome,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl ReviewStrategy for ScriptedStrategy {
    fn source(&self) -> ReviewSource {
        self.source
    }

    async fn attempt(&self, _prompt: &ReviewPrompt) -> StrategyOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

pub(super) struct StalledStrategy;

#[async_trait]
impl ReviewStrategy for StalledStrategy {
    fn source(&self) -> ReviewSource {
        ReviewSource::ServerRelative
    }

    async fn attempt(&self, _prompt: &ReviewPrompt) -> StrategyOutcome {
        tokio::time::sleep(Duration::from_secs(30)).await;
        StrategyOutcome::Success("too late".to_string())
    }
}

pub(super) fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

pub(super) fn acme_profile() -> BusinessProfile {
    BusinessProfile::from_params(ProfileParams {
        business_name: Some("Acme".to_string()),
        business_type: Some("Digital Marketing Agency".to_string()),
        locations: Some("Denver".to_string()),
        ..ProfileParams::default()
    })
}

pub(super) fn fixed_synthesizer(unit: f64) -> FallbackReviewSynthesizer {
    FallbackReviewSynthesizer::new(Arc::new(SequenceRandom::constant(unit)))
}

pub(super) fn transport_down() -> StrategyFailure {
    StrategyFailure::Transport("connection refused".to_string())
}

#[derive(Default)]
pub(super) struct RecordingClipboard {
    writes: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    pub(super) fn writes(&self) -> Vec<String> {
        self.writes.lock().expect("clipboard mutex").clone()
    }
}

impl ClipboardWriter for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<(), SideEffectError> {
        self.writes.lock().expect("clipboard mutex").push(text.to_string());
        Ok(())
    }
}

pub(super) struct DeniedClipboard;

impl ClipboardWriter for DeniedClipboard {
    fn write_text(&self, _text: &str) -> Result<(), SideEffectError> {
        Err(SideEffectError::Clipboard("permission denied".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingNavigator {
    opened: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub(super) fn opened(&self) -> Vec<String> {
        self.opened.lock().expect("navigator mutex").clone()
    }
}

impl ExternalNavigator for RecordingNavigator {
    fn open(&self, url: &str) -> Result<(), SideEffectError> {
        self.opened.lock().expect("navigator mutex").push(url.to_string());
        Ok(())
    }
}

pub(super) struct BlockedNavigator;

impl ExternalNavigator for BlockedNavigator {
    fn open(&self, url: &str) -> Result<(), SideEffectError> {
        Err(SideEffectError::Navigation {
            url: url.to_string(),
            reason: "popup blocked".to_string(),
        })
    }
}
