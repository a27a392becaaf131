//! HTTP-backed model capability
//!
//! An OpenAI-compatible chat-completions client exposing the standardized
//! `send_messages` convention, with `predict` as the simple-string recovery
//! surface. Works against hosted APIs and local gateways (Ollama, LM Studio,
//! vLLM) that speak the same wire protocol.

use crate::config::{ModelSection, ResponseFormat};
use crate::model::capability::{CallConvention, ChatMessage, ModelCapability, ModelError};
use crate::routing::schema::RouteSelection;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// OpenAI-compatible chat-completions capability
#[derive(Debug)]
pub struct HttpModelCapability {
    section: ModelSection,
    format: ResponseFormat,
    api_key: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
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
    content: Option<String>,
}

impl HttpModelCapability {
    /// Create a capability from its config section
    ///
    /// The API key is read once from the configured environment variable;
    /// a configured-but-missing variable is a configuration error rather
    /// than a per-request surprise.
    pub fn new(section: ModelSection, format: ResponseFormat) -> Result<Self, ModelError> {
        let api_key = match &section.api_key_env {
            Some(var) => match std::env::var(var) {
                Ok(key) if !key.is_empty() => Some(key),
                _ => {
                    return Err(ModelError::NotConfigured(format!(
                        "environment variable {var} is not set"
                    )))
                }
            },
            None => None,
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(section.timeout_secs))
            .build()
            .map_err(|e| ModelError::NotConfigured(e.to_string()))?;

        Ok(Self {
            section,
            format,
            api_key,
            client,
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.section.endpoint.trim_end_matches('/')
        )
    }

    /// Structured mode pins the response to the route-selection schema
    fn response_format_body(&self) -> Option<Value> {
        match self.format {
            ResponseFormat::Index => None,
            ResponseFormat::Structured => Some(json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "route_selection",
                    "strict": true,
                    "schema": RouteSelection::json_schema(),
                }
            })),
        }
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<Value, ModelError> {
        let body = ChatCompletionRequest {
            model: &self.section.model,
            messages,
            temperature: self.section.temperature,
            response_format: self.response_format_body(),
        };

        debug!(model = %self.section.model, url = %self.completions_url(), "Sending chat completion request");

        let mut request = self.client.post(self.completions_url()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ModelError::Invocation(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let message = match status.as_u16() {
                401 | 403 => format!("authentication failed ({status}): {detail}"),
                429 => format!("rate limit exceeded: {detail}"),
                _ => format!("HTTP {status}: {detail}"),
            };
            return Err(ModelError::Invocation(message));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Invocation(format!("invalid response body: {e}")))?;

        let content = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| ModelError::Invocation("no content in completion".to_string()))?;

        Ok(Value::String(content))
    }
}

#[async_trait]
impl ModelCapability for HttpModelCapability {
    fn name(&self) -> &str {
        "http"
    }

    fn supports(&self, convention: CallConvention) -> bool {
        matches!(
            convention,
            CallConvention::SendMessages | CallConvention::Predict
        )
    }

    async fn send_messages(&self, messages: &[ChatMessage]) -> Result<Value, ModelError> {
        self.complete(messages).await
    }

    async fn predict(&self, prompt: &str) -> Result<Value, ModelError> {
        self.complete(&[ChatMessage::user(prompt)]).await
    }
}
