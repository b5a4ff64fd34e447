//! Summarization of extracted sections.
//!
//! Sections are sent as a single user message to an OpenAI-compatible
//! chat-completions endpoint. A response that parses but carries no usable
//! message content is reported as `None`, distinct from a failed request.

use crate::config::SummaryConfig;
use crate::error::{Result, TenqError};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Groq's OpenAI-compatible chat-completions endpoint.
pub const DEFAULT_SUMMARY_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Model used when none is configured.
pub const DEFAULT_SUMMARY_MODEL: &str = "llama-3.3-70b-versatile";

/// Sampling temperature sent with every request.
pub const SUMMARY_TEMPERATURE: f32 = 0.7;

/// Request timeout for the summarization call.
pub const SUMMARY_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body kept in [`TenqError::Summary`].
const MAX_ERROR_BODY: usize = 512;

/// Something that can condense a section of text.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `text`.
    ///
    /// Returns `Ok(None)` when the collaborator answered without usable
    /// content.
    async fn summarize(&self, text: &str) -> Result<Option<String>>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

fn build_request<'a>(model: &'a str, text: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: text,
        }],
        temperature: SUMMARY_TEMPERATURE,
    }
}

/// Pull `choices[0].message.content` out of a chat-completions body.
///
/// Bodies that are not chat-completions JSON, or whose first choice has no
/// non-blank content, yield `None`.
pub fn parse_completion(body: &str) -> Option<String> {
    let response: ChatResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            warn!("Unexpected summarization response: {}", e);
            return None;
        }
    };
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY).collect()
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
}

impl ChatCompletionsClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    /// `TenqError::Config` without an API key, `TenqError::Network` if the
    /// HTTP client cannot be built.
    pub fn new(config: &SummaryConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let client = reqwest::Client::builder()
            .timeout(SUMMARY_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Model requests are sent with.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("url", &self.url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Summarizer for ChatCompletionsClient {
    async fn summarize(&self, text: &str) -> Result<Option<String>> {
        info!("Summarizing {} characters with {}", text.len(), self.model);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&build_request(&self.model, text))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Summarization endpoint answered HTTP {}", status);

        if !status.is_success() {
            return Err(TenqError::Summary {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }
        Ok(parse_completion(&body))
    }
}
