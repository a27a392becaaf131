//! Structured output schema for route selections
//!
//! Capabilities that support schema-constrained responses (see
//! [`crate::model::http`]) use this schema to force the model into the
//! `{routeIndex, reasoning}` shape the decoder expects in structured mode.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The structured routing answer requested from a model
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RouteSelection {
    /// Selected route index: 1-based, 0 when no route applies
    #[serde(rename = "routeIndex")]
    pub route_index: i64,

    /// Why this route was selected
    pub reasoning: String,
}

impl RouteSelection {
    /// Generate the JSON schema for this structure
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(RouteSelection);
        serde_json::to_value(schema).expect("Schema should be serializable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_camel_case_route_index() {
        let selection = RouteSelection {
            route_index: 2,
            reasoning: "matches support".to_string(),
        };

        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["routeIndex"], 2);
        assert_eq!(json["reasoning"], "matches support");
    }

    #[test]
    fn test_deserializes_decoder_wire_format() {
        let parsed: RouteSelection =
            serde_json::from_str(r#"{"routeIndex": 1, "reasoning": "billing"}"#).unwrap();
        assert_eq!(parsed.route_index, 1);
    }

    #[test]
    fn test_schema_generation() {
        let schema = RouteSelection::json_schema();

        assert!(schema.is_object());
        assert!(schema["properties"]["routeIndex"].is_object());
        assert!(schema["properties"]["reasoning"].is_object());
    }
}
