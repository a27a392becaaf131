//! Model capability abstraction
//!
//! The model powering routing decisions is supplied externally and its exact
//! calling surface is not known statically. Instead of runtime reflection,
//! every calling convention the router understands is a named operation on
//! this trait, and implementations declare which conventions they expose via
//! [`ModelCapability::supports`]. The adapter selects among declared
//! conventions by a fixed priority; see [`crate::model::adapter`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a user-role message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Message roles in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// The calling conventions a capability may expose, in adapter priority order
///
/// `Predict` is never selected as a primary convention; it is the
/// simple-string recovery surface tried once after a primary convention
/// raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallConvention {
    /// Low-level single-turn generation over chat messages, possibly
    /// returning a nested `generations[0][0].text` result shape
    GenerateChat,
    /// Synchronous messages-style call entry point
    CallMessages,
    /// Messages-style invoke entry point
    InvokeMessages,
    /// Standardized multi-message send entry point
    SendMessages,
    /// Plain-string generation entry point
    GenerateText,
    /// Plain-string call entry point
    CallText,
    /// Plain-string prediction entry point, last-resort recovery only
    Predict,
}

impl fmt::Display for CallConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallConvention::GenerateChat => "generate_chat",
            CallConvention::CallMessages => "call_messages",
            CallConvention::InvokeMessages => "invoke_messages",
            CallConvention::SendMessages => "send_messages",
            CallConvention::GenerateText => "generate_text",
            CallConvention::CallText => "call_text",
            CallConvention::Predict => "predict",
        };
        write!(f, "{name}")
    }
}

/// Model boundary errors
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("Calling convention {0} is not supported by this capability")]
    Unsupported(CallConvention),
    #[error("Capability exposes no compatible calling convention")]
    NoCompatibleConvention,
    #[error("Capability not configured: {0}")]
    NotConfigured(String),
    #[error("Invocation failed: {0}")]
    Invocation(String),
}

/// An externally supplied language-model capability
///
/// Implementations override `supports` to declare their conventions and the
/// corresponding operations; everything else keeps the unsupported default.
/// Operations return their natural output as a JSON value; the adapter
/// normalizes whatever comes back into plain text.
#[async_trait]
pub trait ModelCapability: Send + Sync {
    /// Capability name for logs and diagnostics
    fn name(&self) -> &str;

    /// Whether this capability exposes the given calling convention
    fn supports(&self, convention: CallConvention) -> bool;

    async fn generate_chat(&self, _messages: &[ChatMessage]) -> Result<Value, ModelError> {
        Err(ModelError::Unsupported(CallConvention::GenerateChat))
    }

    async fn call_messages(&self, _messages: &[ChatMessage]) -> Result<Value, ModelError> {
        Err(ModelError::Unsupported(CallConvention::CallMessages))
    }

    async fn invoke_messages(&self, _messages: &[ChatMessage]) -> Result<Value, ModelError> {
        Err(ModelError::Unsupported(CallConvention::InvokeMessages))
    }

    async fn send_messages(&self, _messages: &[ChatMessage]) -> Result<Value, ModelError> {
        Err(ModelError::Unsupported(CallConvention::SendMessages))
    }

    async fn generate_text(&self, _prompt: &str) -> Result<Value, ModelError> {
        Err(ModelError::Unsupported(CallConvention::GenerateText))
    }

    async fn call_text(&self, _prompt: &str) -> Result<Value, ModelError> {
        Err(ModelError::Unsupported(CallConvention::CallText))
    }

    async fn predict(&self, _prompt: &str) -> Result<Value, ModelError> {
        Err(ModelError::Unsupported(CallConvention::Predict))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    #[async_trait]
    impl ModelCapability for Bare {
        fn name(&self) -> &str {
            "bare"
        }
        fn supports(&self, _convention: CallConvention) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_default_operations_are_unsupported() {
        let capability = Bare;
        let err = capability.generate_text("hi").await.unwrap_err();
        assert!(matches!(
            err,
            ModelError::Unsupported(CallConvention::GenerateText)
        ));
    }

    #[test]
    fn test_convention_display_names() {
        assert_eq!(CallConvention::GenerateChat.to_string(), "generate_chat");
        assert_eq!(CallConvention::Predict.to_string(), "predict");
    }

    #[test]
    fn test_message_role_serialization() {
        assert_eq!(
            serde_json::to_string(&MessageRole::User).unwrap(),
            "\"user\""
        );
        assert_eq!(
            serde_json::to_string(&MessageRole::System).unwrap(),
            "\"system\""
        );
    }

    #[test]
    fn test_user_message_constructor() {
        let message = ChatMessage::user("route this");
        assert_eq!(message.role, MessageRole::User);
        assert_eq!(message.content, "route this");
    }
}
