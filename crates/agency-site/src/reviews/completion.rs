use serde::{Deserialize, Serialize};
use url::Url;

use super::strategy::{accept_text, send_json, StrategyFailure};
use crate::config::CompletionConfig;

const SYSTEM_MESSAGE: &str =
    "You write short, natural-sounding customer reviews for local businesses.";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    http: reqwest::Client,
    endpoint: Url,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatCompletionClient {
    pub fn new(http: reqwest::Client, config: &CompletionConfig) -> Result<Self, url::ParseError> {
        let base = config.base_url.as_str().trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/chat/completions"))?;

        Ok(Self {
            http,
            endpoint,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the trimmed `choices[0].message.content` of the completion.
    pub async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, StrategyFailure> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let request = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&body);
        let response: ChatCompletionResponse = send_json(request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                StrategyFailure::MalformedResponse(
                    "missing choices[0].message.content".to_string(),
                )
            })?;

        accept_text(&content)
    }
}
