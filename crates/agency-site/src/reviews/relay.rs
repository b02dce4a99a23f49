use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::completion::ChatCompletionClient;
use crate::error::AppError;
use super::strategy::StrategyFailure;

pub const REVIEW_RELAY_PATH: &str = "/api/openai/generate-review";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReviewRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReviewReply {
    pub review: String,
}

/// Error raised while relaying a prompt to the completion API.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error("review generation is not configured on this server")]
    NotConfigured,
    #[error("review generation failed: {0}")]
    Upstream(#[from] StrategyFailure),
}

/// Server half of the relay strategies: forwards prompts with the server credential.
#[derive(Debug)]
pub struct ReviewRelay {
    client: Arc<ChatCompletionClient>,
    api_key: Option<String>,
}

impl ReviewRelay {
    pub fn new(client: Arc<ChatCompletionClient>, api_key: Option<String>) -> Self {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Self { client, api_key }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, RelayError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(RelayError::EmptyPrompt);
        }
        let api_key = self.api_key.as_deref().ok_or(RelayError::NotConfigured)?;

        let review = self.client.complete(api_key, prompt).await?;
        Ok(review)
    }
}

/// Router exposing the review relay endpoint.
pub fn review_relay_router(relay: Arc<ReviewRelay>) -> Router {
    Router::new()
        .route(REVIEW_RELAY_PATH, post(generate_review_handler))
        .with_state(relay)
}

pub(crate) async fn generate_review_handler(
    State(relay): State<Arc<ReviewRelay>>,
    payload: Result<Json<GenerateReviewRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection, "rejected review relay payload");
            return AppError::from(rejection).into_response();
        }
    };

    match relay.generate(&request.prompt).await {
        Ok(review) => {
            info!(chars = review.len(), "review generated");
            (StatusCode::OK, Json(GenerateReviewReply { review })).into_response()
        }
        Err(err) => {
            let status = match &err {
                RelayError::EmptyPrompt => StatusCode::BAD_REQUEST,
                RelayError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
                RelayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            };
            warn!(error = %err, status = status.as_u16(), "review relay failed");
            (status, Json(json!({ "error": err.to_string() }))).into_response()
        }
    }
}
