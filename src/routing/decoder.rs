//! Decoding route selections out of model text
//!
//! Model output is treated as hostile: it may be a bare index, prose with a
//! number buried in it, clean JSON, JSON wrapped in chatter, or garbage.
//! Decoding never fails; unusable text degrades to the Default index.

use crate::config::ResponseFormat;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("static pattern"));

/// A decoded route selection, always within `[0, route_count]`
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSelection {
    pub index: usize,
    pub reasoning: Option<String>,
}

/// Decode model text into a route index and optional reasoning
///
/// Index mode takes the first run of digits anywhere in the text. Structured
/// mode parses the whole trimmed text as JSON, then the first `{...}`
/// substring, taking a numeric `routeIndex` and optional `reasoning`; when
/// both parses fail it degrades to digit extraction. The decoded index is
/// clamped to Default when out of range, regardless of mode.
pub fn decode(text: &str, format: ResponseFormat, route_count: usize) -> DecodedSelection {
    let (raw_index, reasoning) = match format {
        ResponseFormat::Index => (extract_digit_run(text), None),
        ResponseFormat::Structured => match parse_structured(text) {
            Some((index, reasoning)) => (index, reasoning),
            None => (extract_digit_run(text), None),
        },
    };

    DecodedSelection {
        index: clamp_index(raw_index, route_count),
        reasoning,
    }
}

/// First run of digits anywhere in the text; absence decodes as Default
fn extract_digit_run(text: &str) -> i64 {
    DIGIT_RUN
        .find(text)
        // Runs too long for i64 are out of range by definition
        .map(|m| m.as_str().parse::<i64>().unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Parse structured output: whole text first, embedded `{...}` second
///
/// Returns `None` only when both parse attempts fail; a parse that succeeds
/// without a numeric `routeIndex` decodes as Default with no reasoning.
fn parse_structured(text: &str) -> Option<(i64, Option<String>)> {
    let parsed: Value = serde_json::from_str(text.trim())
        .ok()
        .or_else(|| extract_embedded_object(text))?;

    // Reasoning only counts alongside a numeric routeIndex
    match parsed.get("routeIndex").and_then(Value::as_i64) {
        Some(index) => {
            let reasoning = parsed
                .get("reasoning")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            Some((index, reasoning))
        }
        None => Some((0, None)),
    }
}

/// Locate and parse the first `{` ... last `}` substring
fn extract_embedded_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Clamp to `[0, route_count]`; out-of-range selections become Default
fn clamp_index(index: i64, route_count: usize) -> usize {
    if index < 0 || index as u64 > route_count as u64 {
        if index != 0 {
            warn!(index, route_count, "Decoded route index out of range, using Default");
        }
        0
    } else {
        index as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_mode_bare_number() {
        let decoded = decode("2", ResponseFormat::Index, 3);
        assert_eq!(decoded.index, 2);
        assert!(decoded.reasoning.is_none());
    }

    #[test]
    fn test_index_mode_number_in_prose() {
        let decoded = decode("Route 3 is best", ResponseFormat::Index, 3);
        assert_eq!(decoded.index, 3);
    }

    #[test]
    fn test_index_mode_first_digit_run_wins() {
        let decoded = decode("either 1 or 2", ResponseFormat::Index, 3);
        assert_eq!(decoded.index, 1);
    }

    #[test]
    fn test_index_mode_no_digits_is_default() {
        let decoded = decode("none apply", ResponseFormat::Index, 3);
        assert_eq!(decoded.index, 0);
    }

    #[test]
    fn test_structured_clean_json() {
        let decoded = decode(
            r#"{"routeIndex": 2, "reasoning": "matches support"}"#,
            ResponseFormat::Structured,
            3,
        );
        assert_eq!(decoded.index, 2);
        assert_eq!(decoded.reasoning.as_deref(), Some("matches support"));
    }

    #[test]
    fn test_structured_json_wrapped_in_chatter() {
        let decoded = decode(
            r#"Sure! {"routeIndex": 2, "reasoning": "matches support"} Hope that helps."#,
            ResponseFormat::Structured,
            3,
        );
        assert_eq!(decoded.index, 2);
        assert_eq!(decoded.reasoning.as_deref(), Some("matches support"));
    }

    #[test]
    fn test_structured_unparseable_falls_back_to_digits() {
        let decoded = decode("take route 1 please", ResponseFormat::Structured, 3);
        assert_eq!(decoded.index, 1);
        assert!(decoded.reasoning.is_none());
    }

    #[test]
    fn test_structured_parsed_without_route_index_is_default() {
        let decoded = decode(r#"{"choice": 2}"#, ResponseFormat::Structured, 3);
        assert_eq!(decoded.index, 0);
    }

    #[test]
    fn test_clamps_above_route_count() {
        let decoded = decode("7", ResponseFormat::Index, 3);
        assert_eq!(decoded.index, 0);
    }

    #[test]
    fn test_clamps_negative_structured_index() {
        let decoded = decode(r#"{"routeIndex": -1}"#, ResponseFormat::Structured, 3);
        assert_eq!(decoded.index, 0);
    }

    #[test]
    fn test_boundary_indices_pass() {
        assert_eq!(decode("0", ResponseFormat::Index, 3).index, 0);
        assert_eq!(decode("3", ResponseFormat::Index, 3).index, 3);
    }

    #[test]
    fn test_huge_digit_run_clamps() {
        let decoded = decode("99999999999999999999999", ResponseFormat::Index, 3);
        assert_eq!(decoded.index, 0);
    }

    #[test]
    fn test_empty_reasoning_dropped() {
        let decoded = decode(
            r#"{"routeIndex": 1, "reasoning": ""}"#,
            ResponseFormat::Structured,
            3,
        );
        assert_eq!(decoded.index, 1);
        assert!(decoded.reasoning.is_none());
    }
}
