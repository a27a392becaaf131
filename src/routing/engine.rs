//! Routing orchestrator
//!
//! Sequences the decision tiers per record: content extraction, direct
//! keyword override, model-assisted selection, heuristic fallback, Default.
//! Records are processed strictly one at a time; the model call is the only
//! suspension point, and no state is shared across records beyond the
//! immutable route configuration and aggregate counters.

use crate::config::{FailurePolicy, RouterConfig};
use crate::error::{RouterError, RouterResult};
use crate::model::adapter;
use crate::model::capability::ModelCapability;
use crate::observability::metrics::metrics;
use crate::record::{MatchType, Record, Route, RouteBuckets, RoutingOutcome};
use crate::resolve::resolve_content;
use crate::routing::decoder::decode;
use crate::routing::direct::try_direct_match;
use crate::routing::fallback::fallback_match;
use crate::routing::prompt::build_routing_prompt;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

/// Payload key carrying routing metadata on non-Default records.
/// Write-once: never overwritten if already present.
const ROUTE_INFO_KEY: &str = "ai_router_info";

/// Payload key carrying the error annotation on Default-routed records
const ROUTE_ERROR_KEY: &str = "ai_router_error";

/// Payload key carrying debug diagnostics when debug mode is on
const ANALYSIS_KEY: &str = "ai_router_analysis";

/// Per-item content router
///
/// Holds the immutable route configuration and an optional model
/// capability. Without a capability, records that need a model decision are
/// Default-routed with an error annotation.
pub struct ContentRouter {
    config: RouterConfig,
    model: Option<Arc<dyn ModelCapability>>,
}

impl ContentRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    /// Attach the model capability used for model-assisted decisions
    pub fn with_model(mut self, model: Arc<dyn ModelCapability>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.config.routes
    }

    /// Route a batch into `N+1` ordered buckets (Default first)
    ///
    /// Records are processed sequentially in input order. Under
    /// [`FailurePolicy::Continue`] a failed record becomes a Default-routed
    /// record carrying an `error` field; under [`FailurePolicy::FailFast`]
    /// the first failure aborts the run tagged with the record's position.
    pub async fn route_batch(&self, records: Vec<Record>) -> RouterResult<RouteBuckets> {
        let run_id = Uuid::new_v4();
        let span = crate::routing_span!(%run_id, records = records.len());
        self.route_batch_inner(run_id, records).instrument(span).await
    }

    async fn route_batch_inner(
        &self,
        run_id: Uuid,
        records: Vec<Record>,
    ) -> RouterResult<RouteBuckets> {
        info!(
            %run_id,
            records = records.len(),
            routes = self.config.routes.len(),
            "Routing batch"
        );

        let mut buckets = RouteBuckets::new(self.config.routes.len());

        for (position, record) in records.into_iter().enumerate() {
            match self.route_record(&record).await {
                Ok((outcome, routed)) => {
                    note_outcome(&outcome);
                    debug!(
                        position,
                        index = outcome.selected_index,
                        match_type = ?outcome.match_type,
                        "Record routed"
                    );
                    buckets.push(outcome.selected_index, routed);
                }
                Err(error) => {
                    metrics().record_failure();
                    match self.config.router.on_error {
                        FailurePolicy::FailFast => {
                            return Err(RouterError::record_failed(position, error.to_string()));
                        }
                        FailurePolicy::Continue => {
                            warn!(position, error = %error, "Record failed, collecting into Default");
                            buckets.push(0, recover_failed_record(record, &error));
                        }
                    }
                }
            }
        }

        info!(%run_id, counts = ?buckets.counts(), "Routing batch complete");
        Ok(buckets)
    }

    /// Route a single record, returning the outcome and the routed record
    ///
    /// The input record is never mutated; the returned record is a new value
    /// with any annotations added.
    pub async fn route_record(&self, record: &Record) -> RouterResult<(RoutingOutcome, Record)> {
        let routes = &self.config.routes;
        let content = resolve_content(&record.json, &self.config.router.analysis_field);

        if content.is_empty() {
            debug!("No content to analyze, routing to Default");
            return Ok((outcome(0, MatchType::None, None, None), record.clone()));
        }

        // Deterministic override: a direct keyword hit skips the model and
        // the fallback matcher entirely
        if let Some(index) = try_direct_match(routes, &content) {
            let diagnostics = self.diagnostics(json!({
                "matchType": MatchType::DirectKeyword,
                "routeIndex": index,
                "routeName": routes[index - 1].name,
                "content": content,
            }));
            let routed = self.emit(record, index, None, &diagnostics)?;
            return Ok((outcome(index, MatchType::DirectKeyword, None, diagnostics), routed));
        }

        let Some(model) = &self.model else {
            warn!("No model capability connected, routing to Default");
            return Ok(self.default_with_error(record, &RouterError::ModelUnavailable, MatchType::Error));
        };

        let format = self.config.router.response_format;
        let prompt = build_routing_prompt(&content, routes, format);

        match adapter::invoke(model.as_ref(), &prompt).await {
            Ok(result) => {
                let decoded = decode(&result.text, format, routes.len());
                let selected_route = if decoded.index == 0 {
                    "Default"
                } else {
                    routes[decoded.index - 1].name.as_str()
                };
                let diagnostics = self.diagnostics(json!({
                    "matchType": MatchType::Model,
                    "convention": result.convention,
                    "rawResponse": result.text,
                    "selectedRoute": selected_route,
                    "reasoning": decoded.reasoning.clone().unwrap_or_default(),
                }));
                let routed = self.emit(record, decoded.index, decoded.reasoning.clone(), &diagnostics)?;
                Ok((
                    outcome(decoded.index, MatchType::Model, decoded.reasoning, diagnostics),
                    routed,
                ))
            }
            Err(error) => {
                metrics().model_failure();
                warn!(error = %error, "Model invocation failed, trying keyword fallback");

                let index = fallback_match(routes, &content);
                if index > 0 {
                    let diagnostics = self.diagnostics(json!({
                        "matchType": MatchType::FallbackKeyword,
                        "aiError": error.to_string(),
                        "fallbackRoute": index,
                        "routeName": routes[index - 1].name,
                    }));
                    let routed = self.emit(record, index, None, &diagnostics)?;
                    Ok((outcome(index, MatchType::FallbackKeyword, None, diagnostics), routed))
                } else {
                    let wrapped = RouterError::model_invocation(error.to_string());
                    Ok(self.default_with_error(record, &wrapped, MatchType::Error))
                }
            }
        }
    }

    /// Emit a record at `index`, attaching routing metadata for non-Default routes
    ///
    /// Metadata attachment is monotonic: a payload already carrying
    /// `ai_router_info` keeps it untouched. Attaching to a non-object
    /// payload is the one per-record hard failure in this crate.
    fn emit(
        &self,
        record: &Record,
        index: usize,
        reasoning: Option<String>,
        diagnostics: &Option<Value>,
    ) -> RouterResult<Record> {
        let mut routed = record.clone();

        if index > 0 {
            let Value::Object(map) = &mut routed.json else {
                return Err(RouterError::invalid_record(
                    "cannot attach routing metadata to non-object payload",
                ));
            };
            if !map.contains_key(ROUTE_INFO_KEY) {
                map.insert(
                    ROUTE_INFO_KEY.to_string(),
                    json!({
                        "routeName": self.config.routes[index - 1].name,
                        "routeIndex": index,
                        "reasoning": reasoning.unwrap_or_default(),
                    }),
                );
            }
        }

        Ok(attach_diagnostics(routed, diagnostics))
    }

    /// Default-route a record with an error annotation
    ///
    /// The annotation is optional by design: a non-object payload passes
    /// through unannotated rather than failing.
    fn default_with_error(
        &self,
        record: &Record,
        error: &RouterError,
        match_type: MatchType,
    ) -> (RoutingOutcome, Record) {
        let diagnostics = self.diagnostics(json!({
            "matchType": match_type,
            "aiError": error.to_string(),
            "routedTo": "Default",
        }));

        let mut routed = record.clone();
        if let Value::Object(map) = &mut routed.json {
            map.insert(ROUTE_ERROR_KEY.to_string(), json!(error.to_string()));
        }

        let routed = attach_diagnostics(routed, &diagnostics);
        (outcome(0, match_type, None, diagnostics), routed)
    }

    /// Build debug diagnostics, stamped with the analysis time; `None`
    /// outside debug mode
    fn diagnostics(&self, mut body: Value) -> Option<Value> {
        if !self.config.router.debug {
            return None;
        }
        if let Value::Object(map) = &mut body {
            map.insert("analyzedAt".to_string(), json!(Utc::now().to_rfc3339()));
        }
        Some(body)
    }
}

fn outcome(
    selected_index: usize,
    match_type: MatchType,
    reasoning: Option<String>,
    diagnostics: Option<Value>,
) -> RoutingOutcome {
    RoutingOutcome {
        selected_index,
        match_type,
        reasoning,
        diagnostics,
    }
}

/// Attach debug diagnostics to an object payload; non-objects pass through
fn attach_diagnostics(mut record: Record, diagnostics: &Option<Value>) -> Record {
    if let (Value::Object(map), Some(diag)) = (&mut record.json, diagnostics) {
        map.insert(ANALYSIS_KEY.to_string(), diag.clone());
    }
    record
}

/// Convert a failed record into a Default-bucket record carrying the error
fn recover_failed_record(record: Record, error: &RouterError) -> Record {
    let mut recovered = record;
    recovered.json = match recovered.json {
        Value::Object(mut map) => {
            map.insert("error".to_string(), json!(error.to_string()));
            Value::Object(map)
        }
        other => json!({ "error": error.to_string(), "payload": other }),
    };
    recovered
}

fn note_outcome(outcome: &RoutingOutcome) {
    let collector = metrics();
    collector.record_processed();
    match outcome.match_type {
        MatchType::DirectKeyword => collector.direct_match(),
        MatchType::Model => collector.model_match(),
        MatchType::FallbackKeyword => collector.fallback_match(),
        MatchType::Error | MatchType::None => {}
    }
    if outcome.selected_index == 0 {
        collector.default_routed();
    }
}
