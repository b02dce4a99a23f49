use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::prompt::ReviewPrompt;

/// Where a review came from, in the order the orchestrator tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSource {
    DirectClientApi,
    ServerRelative,
    ServerAbsolute,
    LocalFallback,
}

impl ReviewSource {
    pub fn label(&self) -> &'static str {
        match self {
            ReviewSource::DirectClientApi => "direct completion API",
            ReviewSource::ServerRelative => "server relay (relative)",
            ReviewSource::ServerAbsolute => "server relay (absolute)",
            ReviewSource::LocalFallback => "local template",
        }
    }
}

/// Why a single strategy did not produce a review.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyFailure {
    #[error("transport failed: {0}")]
    Transport(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("unexpected HTTP status {status}")]
    Protocol { status: u16 },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Tagged result of one strategy attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Success(String),
    Failure(StrategyFailure),
}

impl From<Result<String, StrategyFailure>> for StrategyOutcome {
    fn from(value: Result<String, StrategyFailure>) -> Self {
        match value {
            Ok(text) => StrategyOutcome::Success(text),
            Err(failure) => StrategyOutcome::Failure(failure),
        }
    }
}

/// One fallible way of obtaining review text for a prompt.
///
/// Implementations must report every problem as [`StrategyOutcome::Failure`]; the
/// orchestrator relies on attempts never erroring out of band.
#[async_trait]
pub trait ReviewStrategy: Send + Sync {
    fn source(&self) -> ReviewSource;
    async fn attempt(&self, prompt: &ReviewPrompt) -> StrategyOutcome;
}

/// Trims the text and rejects it when nothing is left.
pub(crate) fn accept_text(raw: &str) -> Result<String, StrategyFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StrategyFailure::MalformedResponse(
            "review text is empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn transport_failure(err: reqwest::Error) -> StrategyFailure {
    StrategyFailure::Transport(err.to_string())
}

/// Sends the request and decodes a 2xx JSON body into `T`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, StrategyFailure> {
    let response = request.send().await.map_err(transport_failure)?;

    let status = response.status();
    if !status.is_success() {
        return Err(StrategyFailure::Protocol {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(transport_failure)?;
    serde_json::from_slice(&body).map_err(|err| StrategyFailure::MalformedResponse(err.to_string()))
}
