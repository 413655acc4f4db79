//! Messages API client (content-part requests, `x-api-key` auth)
//!
//! Serves both question answering and remote PDF extraction: the only
//! difference is which content parts go into the single user message.

use super::{AnswerBackend, ANSWER_FAILED, NO_RESPONSE};
use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const API_VERSION: &str = "2023-06-01";

/// One part of a user message
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart<'a> {
    Text { text: &'a str },
    Document { source: DocumentSource<'a> },
}

impl<'a> ContentPart<'a> {
    /// A base64-encoded PDF document part
    pub fn pdf(data_base64: &'a str) -> Self {
        ContentPart::Document {
            source: DocumentSource {
                kind: "base64",
                media_type: crate::source::PDF_MIME_TYPE,
                data: data_base64,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'static str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Client for a Messages-style endpoint
#[derive(Clone)]
pub struct MessagesClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl MessagesClient {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user message and return the first text segment of the reply.
    ///
    /// `Ok(None)` means the call succeeded but the reply carried no text.
    /// Non-success statuses become `Error::Api`, using the API's message when
    /// it reports one and `failure_message` otherwise.
    pub async fn send(
        &self,
        content: Vec<ContentPart<'_>>,
        failure_message: &str,
    ) -> Result<Option<String>> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [UserMessage {
                role: "user",
                content,
            }],
        };

        tracing::debug!(model = %self.model, endpoint = %self.endpoint, "sending messages request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::from_api_body(status.as_u16(), &text, failure_message));
        }

        let parsed: MessagesResponse = serde_json::from_str(&text)?;
        Ok(parsed
            .content
            .unwrap_or_default()
            .into_iter()
            .find_map(|part| part.text))
    }
}

#[async_trait]
impl AnswerBackend for MessagesClient {
    fn name(&self) -> &str {
        "messages"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let answer = self
            .send(vec![ContentPart::Text { text: prompt }], ANSWER_FAILED)
            .await?;
        Ok(answer.unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}
