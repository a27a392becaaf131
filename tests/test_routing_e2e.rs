//! End-to-end routing scenarios
//!
//! Exercises the full decision chain against scripted model capabilities:
//! direct keyword overrides, model decisions in both response formats,
//! fallback matching, Default routing, and annotation behavior.


use ai_router::config::{FailurePolicy, ResponseFormat};
use ai_router::record::{MatchType, Record};
use ai_router::routing::ContentRouter;
use ai_router::testing::MockModelCapability;
use serde_json::json;
use std::sync::Arc;
use test_helpers::{message_record, payload_record, scenario_routes, test_config};

#[tokio::test]
async fn test_direct_keyword_routes_without_model() {
    // Scenario A: "has word 'invoice'" claims the record before any model call
    let model = Arc::new(MockModelCapability::single_response("3"));
    let router = ContentRouter::new(test_config(scenario_routes())).with_model(model.clone());

    let buckets = router
        .route_batch(vec![message_record("please send the invoice")])
        .await
        .unwrap();

    assert_eq!(buckets.route_bucket(1).unwrap().len(), 1);
    assert!(model.invocations().await.is_empty(), "model must not be consulted");
}

#[tokio::test]
async fn test_no_model_routes_to_default_with_annotation() {
    // Scenario B: no capability supplied
    let router = ContentRouter::new(test_config(scenario_routes()));

    let buckets = router
        .route_batch(vec![message_record("what is the price")])
        .await
        .unwrap();

    assert_eq!(buckets.default_bucket().len(), 1);
    assert_eq!(
        buckets.default_bucket()[0].json["ai_router_error"],
        "No model capability connected"
    );
}

#[tokio::test]
async fn test_model_failure_recovers_through_fallback_keywords() {
    // Scenario C: invocation raises, "pricing" from the Sales description
    // rescues the record
    let model = Arc::new(MockModelCapability::with_failure());
    let router = ContentRouter::new(test_config(scenario_routes())).with_model(model);

    let (outcome, routed) = router
        .route_record(&message_record("a question about pricing"))
        .await
        .unwrap();

    assert_eq!(outcome.selected_index, 2);
    assert_eq!(outcome.match_type, MatchType::FallbackKeyword);
    assert_eq!(routed.json["ai_router_info"]["routeName"], "Sales");
}

#[tokio::test]
async fn test_structured_response_with_chatter_decodes() {
    // Scenario D: structured mode, JSON buried in prose
    let mut config = test_config(scenario_routes());
    config.router.response_format = ResponseFormat::Structured;
    let model = Arc::new(MockModelCapability::single_response(
        r#"Sure! {"routeIndex": 2, "reasoning": "matches support"}"#,
    ));
    let router = ContentRouter::new(config).with_model(model);

    let (outcome, routed) = router
        .route_record(&message_record("how much does the plan cost"))
        .await
        .unwrap();

    assert_eq!(outcome.selected_index, 2);
    assert_eq!(outcome.reasoning.as_deref(), Some("matches support"));
    assert_eq!(routed.json["ai_router_info"]["reasoning"], "matches support");
}

#[tokio::test]
async fn test_index_mode_extracts_first_digit_run() {
    // Scenario E: "Route 3 is best" decodes as 3
    let model = Arc::new(MockModelCapability::single_response("Route 3 is best"));
    let router = ContentRouter::new(test_config(scenario_routes())).with_model(model);

    let (outcome, _) = router
        .route_record(&message_record("my app keeps crashing"))
        .await
        .unwrap();

    assert_eq!(outcome.selected_index, 3);
    assert_eq!(outcome.match_type, MatchType::Model);
}

#[tokio::test]
async fn test_empty_content_never_consults_model() {
    let model = Arc::new(MockModelCapability::single_response("1"));
    let router = ContentRouter::new(test_config(scenario_routes())).with_model(model.clone());

    let records = vec![
        payload_record(json!({})),
        payload_record(json!({"unrelated": [1, 2, 3]})),
        payload_record(json!(null)),
    ];
    let buckets = router.route_batch(records).await.unwrap();

    assert_eq!(buckets.default_bucket().len(), 3);
    assert!(model.invocations().await.is_empty());
}

#[tokio::test]
async fn test_batch_partitions_into_exactly_one_bucket_each() {
    let model = Arc::new(MockModelCapability::single_response("2"));
    let router = ContentRouter::new(test_config(scenario_routes())).with_model(model);

    let records = vec![
        message_record("send the invoice"),      // direct -> 1
        message_record("how much does it cost"), // model -> 2
        payload_record(json!({})),               // empty -> 0
        message_record("another cost question"), // model -> 2
    ];
    let buckets = router.route_batch(records).await.unwrap();

    assert_eq!(buckets.counts(), vec![1, 1, 2, 0]);
    let total: usize = buckets.counts().iter().sum();
    assert_eq!(total, 4);
}

#[tokio::test]
async fn test_out_of_range_model_index_clamps_to_default() {
    let model = Arc::new(MockModelCapability::single_response("42"));
    let router = ContentRouter::new(test_config(scenario_routes())).with_model(model);

    let (outcome, _) = router
        .route_record(&message_record("some content"))
        .await
        .unwrap();

    assert_eq!(outcome.selected_index, 0);
}

#[tokio::test]
async fn test_existing_route_info_never_overwritten() {
    let model = Arc::new(MockModelCapability::single_response("2"));
    let router = ContentRouter::new(test_config(scenario_routes())).with_model(model);

    let record = payload_record(json!({
        "message": "cost question",
        "ai_router_info": {"routeName": "Earlier", "routeIndex": 3, "reasoning": "kept"},
    }));

    let (_, routed_once) = router.route_record(&record).await.unwrap();
    let (_, routed_twice) = router.route_record(&routed_once).await.unwrap();

    assert_eq!(routed_twice.json["ai_router_info"]["routeName"], "Earlier");
    assert_eq!(routed_twice.json["ai_router_info"]["routeIndex"], 3);
}

#[tokio::test]
async fn test_routing_preserves_existing_payload_keys() {
    let model = Arc::new(MockModelCapability::single_response("2"));
    let router = ContentRouter::new(test_config(scenario_routes())).with_model(model);

    let record = payload_record(json!({
        "message": "cost question",
        "customer_id": 981,
        "tags": ["vip"],
    }));
    let (_, routed) = router.route_record(&record).await.unwrap();

    assert_eq!(routed.json["customer_id"], 981);
    assert_eq!(routed.json["tags"], json!(["vip"]));
    assert_eq!(routed.json["message"], "cost question");
}

#[tokio::test]
async fn test_metadata_passes_through_untouched() {
    let model = Arc::new(MockModelCapability::single_response("2"));
    let router = ContentRouter::new(test_config(scenario_routes())).with_model(model);

    let record = Record::with_metadata(json!({"message": "cost question"}), json!({"origin": 5}));
    let (_, routed) = router.route_record(&record).await.unwrap();

    assert_eq!(routed.metadata, Some(json!({"origin": 5})));
}

#[tokio::test]
async fn test_fail_fast_aborts_with_record_position() {
    let model = Arc::new(MockModelCapability::single_response("1"));
    let mut config = test_config(scenario_routes());
    config.router.analysis_field = "0".to_string();
    config.router.on_error = FailurePolicy::FailFast;
    let router = ContentRouter::new(config).with_model(model);

    // Second record is an array payload: content resolves via the hint but
    // routing metadata cannot be attached
    let records = vec![
        payload_record(json!({})),
        payload_record(json!(["talk about cost"])),
    ];
    let err = router.route_batch(records).await.unwrap_err();

    assert!(err.to_string().starts_with("Record 1 failed"));
}

#[tokio::test]
async fn test_continue_policy_keeps_batch_going() {
    let model = Arc::new(MockModelCapability::single_response("1"));
    let mut config = test_config(scenario_routes());
    config.router.analysis_field = "0".to_string();
    let router = ContentRouter::new(config).with_model(model);

    let records = vec![
        payload_record(json!(["talk about cost"])),
        payload_record(json!({})),
    ];
    let buckets = router.route_batch(records).await.unwrap();

    // Failed record recovered into Default with an error field; empty record
    // passed through to Default
    assert_eq!(buckets.default_bucket().len(), 2);
    assert!(buckets.default_bucket()[0].json.get("error").is_some());
}

#[tokio::test]
async fn test_debug_mode_annotates_but_does_not_change_outcome() {
    let plain_router = ContentRouter::new(test_config(scenario_routes()))
        .with_model(Arc::new(MockModelCapability::single_response("2")));
    let mut debug_config = test_config(scenario_routes());
    debug_config.router.debug = true;
    let debug_router = ContentRouter::new(debug_config)
        .with_model(Arc::new(MockModelCapability::single_response("2")));

    let record = message_record("cost question");
    let (plain_outcome, plain_routed) = plain_router.route_record(&record).await.unwrap();
    let (debug_outcome, debug_routed) = debug_router.route_record(&record).await.unwrap();

    assert_eq!(plain_outcome.selected_index, debug_outcome.selected_index);
    assert!(plain_routed.json.get("ai_router_analysis").is_none());
    assert_eq!(
        debug_routed.json["ai_router_analysis"]["matchType"],
        "model"
    );
}
