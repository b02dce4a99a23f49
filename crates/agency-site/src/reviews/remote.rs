use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use super::completion::ChatCompletionClient;
use super::prompt::ReviewPrompt;
use super::relay::{GenerateReviewReply, GenerateReviewRequest, REVIEW_RELAY_PATH};
use super::strategy::{accept_text, send_json, ReviewSource, ReviewStrategy, StrategyOutcome};

/// Calls the completion API straight from the client with a caller-supplied key.
#[derive(Debug, Clone)]
pub struct DirectCompletionStrategy {
    client: Arc<ChatCompletionClient>,
    api_key: String,
}

impl DirectCompletionStrategy {
    pub fn new(client: Arc<ChatCompletionClient>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ReviewStrategy for DirectCompletionStrategy {
    fn source(&self) -> ReviewSource {
        ReviewSource::DirectClientApi
    }

    async fn attempt(&self, prompt: &ReviewPrompt) -> StrategyOutcome {
        self.client
            .complete(&self.api_key, prompt.as_str())
            .await
            .into()
    }
}

/// Posts the prompt to the site's review relay endpoint.
#[derive(Debug, Clone)]
pub struct ServerRelayStrategy {
    http: reqwest::Client,
    endpoint: Url,
    source: ReviewSource,
}

impl ServerRelayStrategy {
    /// Resolves the relay path against the page the request originates from.
    pub fn relative(http: reqwest::Client, page_origin: &Url) -> Result<Self, url::ParseError> {
        let endpoint = page_origin.join(REVIEW_RELAY_PATH)?;
        Ok(Self {
            http,
            endpoint,
            source: ReviewSource::ServerRelative,
        })
    }

    /// Builds the relay URL from the bare origin of `server_origin`, ignoring any path on it.
    pub fn absolute(http: reqwest::Client, server_origin: &Url) -> Result<Self, url::ParseError> {
        let origin = server_origin.origin().ascii_serialization();
        let endpoint = Url::parse(&format!("{origin}{REVIEW_RELAY_PATH}"))?;
        Ok(Self {
            http,
            endpoint,
            source: ReviewSource::ServerAbsolute,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ReviewStrategy for ServerRelayStrategy {
    fn source(&self) -> ReviewSource {
        self.source
    }

    async fn attempt(&self, prompt: &ReviewPrompt) -> StrategyOutcome {
        let request = self
            .http
            .post(self.endpoint.clone())
            .json(&GenerateReviewRequest {
                prompt: prompt.as_str().to_string(),
            });

        match send_json::<GenerateReviewReply>(request).await {
            Ok(reply) => accept_text(&reply.review).into(),
            Err(failure) => StrategyOutcome::Failure(failure),
        }
    }
}
