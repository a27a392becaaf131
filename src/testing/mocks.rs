//! Mock implementations for testing
//!
//! Provides a scriptable [`MockModelCapability`] so routing behavior can be
//! tested without a real model: declared conventions, canned responses, and
//! per-convention failures are all configurable.

use crate::model::capability::{CallConvention, ChatMessage, ModelCapability, ModelError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock model capability with scripted responses
///
/// Responses rotate in order across invocations, mirroring a scripted
/// conversation. Conventions marked failing raise instead of responding,
/// with the convention name in the error message.
#[derive(Debug)]
pub struct MockModelCapability {
    responses: Vec<Value>,
    current_response: Arc<Mutex<usize>>,
    conventions: HashSet<CallConvention>,
    failing: HashSet<CallConvention>,
    invocations: Arc<Mutex<Vec<CallConvention>>>,
}

impl MockModelCapability {
    /// Create a mock with scripted responses, exposing `send_messages` only
    pub fn new(responses: Vec<Value>) -> Self {
        Self {
            responses,
            current_response: Arc::new(Mutex::new(0)),
            conventions: [CallConvention::SendMessages].into_iter().collect(),
            failing: HashSet::new(),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock answering every invocation with one string
    pub fn single_response(response: impl Into<String>) -> Self {
        Self::new(vec![Value::String(response.into())])
    }

    /// Create a mock whose only declared convention always raises
    pub fn with_failure() -> Self {
        Self::new(vec![]).failing_on(CallConvention::SendMessages)
    }

    /// Replace the declared conventions
    pub fn with_conventions(mut self, conventions: &[CallConvention]) -> Self {
        self.conventions = conventions.iter().copied().collect();
        self
    }

    /// Mark a convention as raising on invocation
    pub fn failing_on(mut self, convention: CallConvention) -> Self {
        self.failing.insert(convention);
        self
    }

    /// Conventions invoked so far, in call order
    pub async fn invocations(&self) -> Vec<CallConvention> {
        self.invocations.lock().await.clone()
    }

    async fn respond(&self, convention: CallConvention) -> Result<Value, ModelError> {
        self.invocations.lock().await.push(convention);

        if self.failing.contains(&convention) {
            return Err(ModelError::Invocation(format!(
                "mock {convention} failure"
            )));
        }

        let mut current = self.current_response.lock().await;
        let index = *current % self.responses.len().max(1);
        *current += 1;

        Ok(self
            .responses
            .get(index)
            .cloned()
            .unwrap_or_else(|| Value::String("Mock response".to_string())))
    }
}

#[async_trait]
impl ModelCapability for MockModelCapability {
    fn name(&self) -> &str {
        "mock"
    }

    fn supports(&self, convention: CallConvention) -> bool {
        self.conventions.contains(&convention)
    }

    async fn generate_chat(&self, _messages: &[ChatMessage]) -> Result<Value, ModelError> {
        self.respond(CallConvention::GenerateChat).await
    }

    async fn call_messages(&self, _messages: &[ChatMessage]) -> Result<Value, ModelError> {
        self.respond(CallConvention::CallMessages).await
    }

    async fn invoke_messages(&self, _messages: &[ChatMessage]) -> Result<Value, ModelError> {
        self.respond(CallConvention::InvokeMessages).await
    }

    async fn send_messages(&self, _messages: &[ChatMessage]) -> Result<Value, ModelError> {
        self.respond(CallConvention::SendMessages).await
    }

    async fn generate_text(&self, _prompt: &str) -> Result<Value, ModelError> {
        self.respond(CallConvention::GenerateText).await
    }

    async fn call_text(&self, _prompt: &str) -> Result<Value, ModelError> {
        self.respond(CallConvention::CallText).await
    }

    async fn predict(&self, _prompt: &str) -> Result<Value, ModelError> {
        self.respond(CallConvention::Predict).await
    }
}
