//! Property tests for the pure routing components
//!
//! The resolver, decoder, and keyword matchers are total functions; these
//! properties pin the invariants the orchestrator relies on.

use ai_router::config::ResponseFormat;
use ai_router::record::Route;
use ai_router::resolve::resolve_content;
use ai_router::routing::{decode, fallback_match, try_direct_match};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Arbitrary JSON payload trees, a few levels deep
fn arb_payload() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z ]{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn arb_routes() -> impl Strategy<Value = Vec<Route>> {
    prop::collection::vec(("[A-Za-z ]{1,12}", "[a-z '\"]{0,30}"), 0..5).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(name, description)| Route::new(name, description))
            .collect()
    })
}

proptest! {
    #[test]
    fn resolver_is_idempotent(payload in arb_payload(), hint in "[a-z.]{0,12}") {
        let first = resolve_content(&payload, &hint);
        let second = resolve_content(&payload, &hint);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn resolver_never_panics_on_any_hint(payload in arb_payload(), hint in "\\PC{0,24}") {
        let _ = resolve_content(&payload, &hint);
    }

    #[test]
    fn decoded_index_always_within_bounds(text in "\\PC{0,60}", route_count in 0usize..8) {
        let indexed = decode(&text, ResponseFormat::Index, route_count);
        prop_assert!(indexed.index <= route_count);

        let structured = decode(&text, ResponseFormat::Structured, route_count);
        prop_assert!(structured.index <= route_count);
    }

    #[test]
    fn structured_route_index_clamps(index in -1000i64..1000, route_count in 0usize..8) {
        let text = format!(r#"{{"routeIndex": {index}}}"#);
        let decoded = decode(&text, ResponseFormat::Structured, route_count);
        prop_assert!(decoded.index <= route_count);
        if index >= 0 && (index as usize) <= route_count {
            prop_assert_eq!(decoded.index, index as usize);
        } else {
            prop_assert_eq!(decoded.index, 0);
        }
    }

    #[test]
    fn fallback_index_always_within_bounds(routes in arb_routes(), content in "[a-z ]{0,40}") {
        let index = fallback_match(&routes, &content);
        prop_assert!(index <= routes.len());
    }

    #[test]
    fn direct_match_index_names_configured_route(routes in arb_routes(), content in "[a-z ]{0,40}") {
        if let Some(index) = try_direct_match(&routes, &content) {
            prop_assert!(index >= 1);
            prop_assert!(index <= routes.len());
        }
    }

    #[test]
    fn direct_keyword_claim_is_deterministic(word in "[a-z]{4,10}") {
        let routes = vec![Route::new("Claimed", format!("has word '{word}'"))];
        let content = format!("something {word} something");
        prop_assert_eq!(try_direct_match(&routes, &content), Some(1));
    }
}
