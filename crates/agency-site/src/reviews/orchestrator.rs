use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::completion::ChatCompletionClient;
use super::profile::BusinessProfile;
use super::prompt::ReviewPrompt;
use super::remote::{DirectCompletionStrategy, ServerRelayStrategy};
use super::strategy::{ReviewSource, ReviewStrategy, StrategyFailure, StrategyOutcome};
use super::synthesizer::FallbackReviewSynthesizer;
use crate::config::ReviewConfig;

/// A strategy that did not produce text, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedAttempt {
    pub source: ReviewSource,
    #[serde(serialize_with = "serialize_failure")]
    pub failure: StrategyFailure,
}

fn serialize_failure<S>(failure: &StrategyFailure, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(failure)
}

/// Review text plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquiredReview {
    pub text: String,
    pub source: ReviewSource,
    pub attempts: Vec<FailedAttempt>,
}

/// Tries each strategy in order and falls back to the local synthesizer.
///
/// The synthesizer is kept apart from the fallible list, so [`ReviewOrchestrator::acquire`]
/// has no error path.
pub struct ReviewOrchestrator {
    strategies: Vec<Box<dyn ReviewStrategy>>,
    fallback: FallbackReviewSynthesizer,
    timeout: Option<Duration>,
}

impl ReviewOrchestrator {
    pub fn new(
        strategies: Vec<Box<dyn ReviewStrategy>>,
        fallback: FallbackReviewSynthesizer,
    ) -> Self {
        Self {
            strategies,
            fallback,
            timeout: None,
        }
    }

    /// Caps each strategy attempt; an elapsed attempt counts as a failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Standard chain for a profile: direct API (only with a client key), relative relay,
    /// absolute relay.
    pub fn for_profile(
        profile: &BusinessProfile,
        completion: Arc<ChatCompletionClient>,
        http: reqwest::Client,
        config: &ReviewConfig,
        fallback: FallbackReviewSynthesizer,
    ) -> Result<Self, url::ParseError> {
        let mut strategies: Vec<Box<dyn ReviewStrategy>> = Vec::with_capacity(3);

        if let Some(api_key) = profile.api_key() {
            strategies.push(Box::new(DirectCompletionStrategy::new(completion, api_key)));
        }
        strategies.push(Box::new(ServerRelayStrategy::relative(
            http.clone(),
            &config.page_origin,
        )?));
        strategies.push(Box::new(ServerRelayStrategy::absolute(
            http,
            &config.server_origin,
        )?));

        Ok(Self::new(strategies, fallback).with_timeout(config.strategy_timeout))
    }

    pub fn sources(&self) -> Vec<ReviewSource> {
        self.strategies
            .iter()
            .map(|strategy| strategy.source())
            .chain(std::iter::once(ReviewSource::LocalFallback))
            .collect()
    }

    pub async fn acquire(&self, profile: &BusinessProfile, prompt: &ReviewPrompt) -> AcquiredReview {
        let mut attempts = Vec::new();

        for strategy in &self.strategies {
            let source = strategy.source();
            debug!(strategy = source.label(), "attempting review strategy");

            match self.run(strategy.as_ref(), prompt).await {
                StrategyOutcome::Success(text) => {
                    info!(strategy = source.label(), failed = attempts.len(), "review acquired");
                    return AcquiredReview {
                        text,
                        source,
                        attempts,
                    };
                }
                StrategyOutcome::Failure(failure) => {
                    warn!(strategy = source.label(), error = %failure, "review strategy failed");
                    attempts.push(FailedAttempt { source, failure });
                }
            }
        }

        let text = self.fallback.synthesize(
            profile.name(),
            profile.business_type(),
            prompt.location().or_else(|| profile.locations().first().map(String::as_str)),
        );
        info!(failed = attempts.len(), "using local review template");

        AcquiredReview {
            text,
            source: ReviewSource::LocalFallback,
            attempts,
        }
    }

    async fn run(&self, strategy: &dyn ReviewStrategy, prompt: &ReviewPrompt) -> StrategyOutcome {
        let Some(limit) = self.timeout else {
            return strategy.attempt(prompt).await;
        };

        match tokio::time::timeout(limit, strategy.attempt(prompt)).await {
            Ok(outcome) => outcome,
            Err(_) => StrategyOutcome::Failure(StrategyFailure::Timeout(limit)),
        }
    }
}

impl std::fmt::Debug for ReviewOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewOrchestrator")
            .field("sources", &self.sources())
            .field("timeout", &self.timeout)
            .finish()
    }
}
