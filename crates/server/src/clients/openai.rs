//! OpenAI Responses API client used by the language-model move selector.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerationError, TextGenerator};

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    temperature: f32,
}

#[derive(Deserialize)]
struct ResponsesReply {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .user_agent("MiniGPTChess/1.0")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/responses", self.base_url);
        let body = ResponsesRequest {
            model: &self.model,
            input: prompt,
            // Deterministic sampling: retries only cover transport failures
            temperature: 0.0,
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let reply: ResponsesReply = resp.json().await?;
        let text = first_output_text(&reply).ok_or(GenerationError::EmptyReply)?;
        debug!(model = %self.model, reply = %text, "OpenAI reply");
        Ok(text)
    }
}

/// First `output_text` part of the first `message` item.
fn first_output_text(reply: &ResponsesReply) -> Option<String> {
    reply
        .output
        .iter()
        .filter(|item| item.kind == "message")
        .flat_map(|item| item.content.iter())
        .find(|part| part.kind == "output_text")
        .and_then(|part| part.text.clone())
}
