//! Priority-ordered capability invocation and output normalization
//!
//! The adapter bridges the router to whatever calling surface the supplied
//! capability happens to expose. It selects the first convention the
//! capability declares, invokes it once, and normalizes the result into
//! plain text. A raised invocation may be recovered exactly once through the
//! plain-string `predict` surface; on recovery failure the original error is
//! the one surfaced.

use crate::model::capability::{CallConvention, ChatMessage, ModelCapability, ModelError};
use serde_json::Value;
use tracing::{debug, warn};

/// Primary conventions in selection priority order (`predict` excluded:
/// it is recovery-only)
const PRIORITY: [CallConvention; 6] = [
    CallConvention::GenerateChat,
    CallConvention::CallMessages,
    CallConvention::InvokeMessages,
    CallConvention::SendMessages,
    CallConvention::GenerateText,
    CallConvention::CallText,
];

/// Normalized result of one model invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCallResult {
    /// Plain-text model answer
    pub text: String,
    /// The convention that actually produced the answer
    pub convention: CallConvention,
}

/// Invoke `capability` with `prompt` through its highest-priority convention
///
/// Fails with [`ModelError::NoCompatibleConvention`] when the capability
/// declares none of the primary conventions. When the chosen convention
/// raises, `predict` is attempted once as a final recovery if declared; its
/// failure surfaces the original error.
pub async fn invoke(
    capability: &dyn ModelCapability,
    prompt: &str,
) -> Result<ModelCallResult, ModelError> {
    let convention = PRIORITY
        .into_iter()
        .find(|c| capability.supports(*c))
        .ok_or(ModelError::NoCompatibleConvention)?;

    debug!(capability = capability.name(), %convention, "Invoking model");

    match dispatch(capability, convention, prompt).await {
        Ok(value) => Ok(ModelCallResult {
            text: normalize_output(&value, convention),
            convention,
        }),
        Err(primary) => {
            if capability.supports(CallConvention::Predict) {
                warn!(
                    capability = capability.name(),
                    %convention,
                    error = %primary,
                    "Convention raised, attempting predict recovery"
                );
                if let Ok(value) = capability.predict(prompt).await {
                    return Ok(ModelCallResult {
                        text: normalize_output(&value, CallConvention::Predict),
                        convention: CallConvention::Predict,
                    });
                }
            }
            Err(primary)
        }
    }
}

async fn dispatch(
    capability: &dyn ModelCapability,
    convention: CallConvention,
    prompt: &str,
) -> Result<Value, ModelError> {
    let messages = [ChatMessage::user(prompt)];

    match convention {
        CallConvention::GenerateChat => capability.generate_chat(&messages).await,
        CallConvention::CallMessages => capability.call_messages(&messages).await,
        CallConvention::InvokeMessages => capability.invoke_messages(&messages).await,
        CallConvention::SendMessages => capability.send_messages(&messages).await,
        CallConvention::GenerateText => capability.generate_text(prompt).await,
        CallConvention::CallText => capability.call_text(prompt).await,
        CallConvention::Predict => capability.predict(prompt).await,
    }
}

/// Coerce whatever a capability returned into plain text
///
/// Strings pass through. The low-level generation convention may return the
/// nested `generations[0][0].text` shape, which is unwrapped first. Other
/// objects probe `text`, `response`, `output` in order, skipping null and
/// empty values. Everything else renders as its JSON text.
fn normalize_output(value: &Value, convention: CallConvention) -> String {
    if convention == CallConvention::GenerateChat {
        if let Some(text) = value
            .pointer("/generations/0/0/text")
            .and_then(Value::as_str)
        {
            return text.to_string();
        }
    }

    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            for key in ["text", "response", "output"] {
                match map.get(key) {
                    None | Some(Value::Null) => continue,
                    Some(Value::String(s)) if s.is_empty() => continue,
                    Some(Value::String(s)) => return s.clone(),
                    Some(other) => return other.to_string(),
                }
            }
            value.to_string()
        }
        other => other.to_string(),
    }
}
