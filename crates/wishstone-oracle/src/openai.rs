//! OpenAI chat-completions classifier.
//!
//! The wish text is sent verbatim as the single user message. The response
//! is constrained by a strict JSON schema to
//! `{"wish_type": Material|Feeling|Achieve, "sentiment": Positive|Negative|Neutral}`.
//! One attempt per call, bounded by the client timeout; no retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use wishstone_types::wish::{Classification, Sentiment, WishType};

use crate::{Classifier, OracleError, Result};

/// Default chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Default upper bound on one classification round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest provider error body kept in [`OracleError::Status`].
const MAX_ERROR_BODY: usize = 200;

/// Connection settings for [`OpenAiClassifier`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
    pub api_key: String,
}

impl OpenAiConfig {
    /// Defaults with the given API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            timeout: DEFAULT_TIMEOUT,
            api_key: api_key.into(),
        }
    }
}

/// Classifier backed by an OpenAI-compatible chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenAiClassifier {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClassifier {
    /// Build a client. Fails if the API key is empty or the HTTP client
    /// cannot be constructed.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(OracleError::Unavailable("API key is empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn request_body(&self, text: &str) -> Value {
        json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": [
                { "role": "user", "content": text }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "Category",
                    "strict": true,
                    "schema": {
                        "type": "object",
                        "properties": {
                            "wish_type": {
                                "type": "string",
                                "enum": ["Material", "Feeling", "Achieve"]
                            },
                            "sentiment": {
                                "type": "string",
                                "enum": ["Positive", "Negative", "Neutral"]
                            }
                        },
                        "required": ["wish_type", "sentiment"],
                        "additionalProperties": false
                    }
                }
            }
        })
    }
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(text))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Classifier response");
        if !status.is_success() {
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        parse_completion(&body)
    }
}

#[derive(Debug, Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Category {
    wish_type: String,
    sentiment: String,
}

/// Extract a complete label pair from a chat-completions response body.
pub fn parse_completion(body: &str) -> Result<Classification> {
    let completion: Completion = serde_json::from_str(body)
        .map_err(|e| OracleError::MalformedResponse(format!("completion: {e}")))?;

    let message = completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| OracleError::MalformedResponse("no choices".into()))?;

    if let Some(refusal) = message.refusal.filter(|r| !r.is_empty()) {
        return Err(OracleError::Refused(refusal));
    }

    let content = message
        .content
        .ok_or_else(|| OracleError::MalformedResponse("empty message content".into()))?;
    let category: Category = serde_json::from_str(&content)
        .map_err(|e| OracleError::MalformedResponse(format!("category: {e}")))?;

    let wish_type: WishType = category
        .wish_type
        .parse()
        .map_err(|e| OracleError::MalformedResponse(format!("{e}")))?;
    let sentiment: Sentiment = category
        .sentiment
        .parse()
        .map_err(|e| OracleError::MalformedResponse(format!("{e}")))?;

    let classification = Classification::new(wish_type, sentiment);
    if !classification.is_complete() {
        return Err(OracleError::MalformedResponse(format!(
            "incomplete label pair: {wish_type}/{sentiment}"
        )));
    }
    Ok(classification)
}
