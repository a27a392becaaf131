//! Analysis-content extraction from shape-unknown records
//!
//! Records arrive as arbitrary JSON trees, frequently the output of upstream
//! model or agent steps whose exact shape is not known statically. The
//! resolver walks a dotted-path hint first and then falls back to a
//! prioritized ladder of well-known content fields. It is a pure read:
//! absent values degrade to an empty string, never an error.

use serde_json::Value;
use tracing::debug;

/// Common top-level field names that carry chat or message content
const CONTENT_FIELDS: &[&str] = &["chatInput", "message", "text", "content", "input"];

/// Property names probed inside a nested `result` object
const RESULT_FIELDS: &[&str] = &["output", "response", "text", "content", "message"];

/// Extract the text to analyze from `payload`
///
/// If `path_hint` is non-empty it is split on `.` and walked depth-first;
/// a missing segment at any depth yields empty. When the hint resolves to
/// nothing, fallback probes run against the top level in strict priority
/// order and the first non-empty hit wins. Returns an empty string when no
/// content can be found, which signals the caller to route to Default
/// without consulting the model.
pub fn resolve_content(payload: &Value, path_hint: &str) -> String {
    if !path_hint.is_empty() {
        if let Some(value) = walk_path(payload, path_hint) {
            let content = value_to_content(value);
            if !content.is_empty() {
                return content;
            }
        }
    }

    if let Some(content) = probe_fallback_fields(payload) {
        return content;
    }

    String::new()
}

/// Walk a dotted path through the tree, returning the value it lands on
///
/// Object segments are key lookups; a segment that parses as an index steps
/// into arrays. Any miss terminates the walk with `None`.
fn walk_path<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = payload;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Render a path-hint hit as analyzable text
///
/// Scalars use their natural display form; objects and arrays render as
/// their JSON text so nested hits stay analyzable instead of degrading to
/// a placeholder. Null is no content.
fn value_to_content(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Render a probed value as content, rejecting structured values
///
/// Fallback probes only accept scalar content; nested objects are handled
/// by the dedicated `output`/`result`/`response` ladders below.
fn scalar_content(value: &Value) -> Option<String> {
    let content = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}

/// Probe a nested object for the first scalar among `fields`
fn probe_object(value: &Value, fields: &[&str]) -> Option<String> {
    let map = value.as_object()?;
    fields.iter().find_map(|field| map.get(*field).and_then(scalar_content))
}

fn probe_fallback_fields(payload: &Value) -> Option<String> {
    let map = payload.as_object()?;

    // Common chat/message content fields
    for field in CONTENT_FIELDS {
        if let Some(content) = map.get(*field).and_then(scalar_content) {
            debug!(field, "Found content in alternative field");
            return Some(content);
        }
    }

    // Agent output format, possibly nested
    if let Some(output) = map.get("output") {
        if let Some(content) =
            scalar_content(output).or_else(|| probe_object(output, &["text", "content"]))
        {
            debug!("Found content in output field");
            return Some(content);
        }
    }

    // Result envelopes carrying additional metadata
    if let Some(result) = map.get("result") {
        if let Some(content) =
            scalar_content(result).or_else(|| probe_object(result, RESULT_FIELDS))
        {
            debug!("Found content in result field");
            return Some(content);
        }
    }

    // Classic response shapes
    if let Some(response) = map.get("response") {
        if let Some(content) = scalar_content(response).or_else(|| probe_object(response, &["text"]))
        {
            debug!("Found content in response field");
            return Some(content);
        }
    }

    None
}
