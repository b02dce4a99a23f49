//! Review acquisition pipeline used by the embeddable review generator.
//!
//! A [`BusinessProfile`] parametrizes a [`ReviewPrompt`]; the [`ReviewOrchestrator`] walks
//! its strategies in order and ends at the [`FallbackReviewSynthesizer`], after which the
//! [`SideEffectExecutor`] copies the text and opens the business maps page. The
//! [`relay`] module holds the server endpoint the relay strategies talk to.

pub mod completion;
pub mod effects;
pub mod orchestrator;
pub mod profile;
pub mod prompt;
pub mod relay;
pub mod remote;
pub mod strategy;
pub mod synthesizer;

#[cfg(test)]
mod tests;

pub use completion::ChatCompletionClient;
pub use effects::{
    ClipboardWriter, EffectStatus, ExternalNavigator, SideEffectError, SideEffectExecutor,
    SideEffectReport, SystemBrowser, SystemClipboard,
};
pub use orchestrator::{AcquiredReview, FailedAttempt, ReviewOrchestrator};
pub use profile::{BusinessProfile, ProfileParams};
pub use prompt::ReviewPrompt;
pub use relay::{
    review_relay_router, GenerateReviewReply, GenerateReviewRequest, RelayError, ReviewRelay,
    REVIEW_RELAY_PATH,
};
pub use remote::{DirectCompletionStrategy, ServerRelayStrategy};
pub use strategy::{ReviewSource, ReviewStrategy, StrategyFailure, StrategyOutcome};
pub use synthesizer::{FallbackReviewSynthesizer, RandomSource, SequenceRandom, ThreadRandom};
