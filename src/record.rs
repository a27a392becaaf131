//! Record and routing outcome types
//!
//! A [`Record`] is an arbitrary JSON payload tree plus opaque pass-through
//! metadata, owned by the caller. The engine never mutates an input record:
//! routed records are new values with added top-level keys, and existing keys
//! are never removed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named, described destination branch a record may be sent to
///
/// Routes are an ordered sequence; a route's 1-based position is its route
/// index. Index 0 is reserved for the implicit Default route. Indices are
/// stable for the lifetime of one routing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Name of this route for identification
    pub name: String,
    /// Description of when this route should be taken
    pub description: String,
}

impl Route {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A single item flowing through the router
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The payload tree to analyze and route
    pub json: Value,
    /// Opaque pass-through metadata, untouched by the router
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Record {
    pub fn new(json: Value) -> Self {
        Self {
            json,
            metadata: None,
        }
    }

    pub fn with_metadata(json: Value, metadata: Value) -> Self {
        Self {
            json,
            metadata: Some(metadata),
        }
    }
}

/// How the route decision for a record was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Deterministic `has word` keyword match, model bypassed
    DirectKeyword,
    /// Decision decoded from a model response
    Model,
    /// Heuristic keyword match after model failure
    FallbackKeyword,
    /// Model unavailable or invocation failed with no fallback hit
    Error,
    /// Nothing to analyze; routed to Default without consulting anything
    None,
}

/// Routing decision for one record, produced fresh per record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingOutcome {
    /// Selected bucket: 0 for Default, 1..=N for configured routes
    pub selected_index: usize,
    /// Which strategy produced the decision
    pub match_type: MatchType,
    /// Model-provided reasoning, when structured mode yields one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Structured trace attached in debug mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Value>,
}

impl RoutingOutcome {
    /// Check if this outcome routes to the Default bucket
    pub fn is_default(&self) -> bool {
        self.selected_index == 0
    }
}

/// Ordered output buckets: Default first, then one per configured route
///
/// Every input record appears in exactly one bucket.
#[derive(Debug, Clone, Serialize)]
pub struct RouteBuckets {
    buckets: Vec<Vec<Record>>,
}

impl RouteBuckets {
    /// Create empty buckets for `route_count` routes plus the Default
    pub fn new(route_count: usize) -> Self {
        Self {
            buckets: (0..=route_count).map(|_| Vec::new()).collect(),
        }
    }

    /// Push a record into the bucket at `index` (0 = Default)
    ///
    /// Out-of-range indices land in Default; the decoder clamps before this
    /// point, so this is a second line of defense only.
    pub fn push(&mut self, index: usize, record: Record) {
        let index = if index < self.buckets.len() { index } else { 0 };
        self.buckets[index].push(record);
    }

    /// The Default bucket (index 0)
    pub fn default_bucket(&self) -> &[Record] {
        &self.buckets[0]
    }

    /// The bucket for the route at 1-based `index`, if configured
    pub fn route_bucket(&self, index: usize) -> Option<&[Record]> {
        if index == 0 {
            return None;
        }
        self.buckets.get(index).map(|b| b.as_slice())
    }

    /// Number of buckets including Default
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.is_empty())
    }

    /// Record count per bucket, Default first
    pub fn counts(&self) -> Vec<usize> {
        self.buckets.iter().map(|b| b.len()).collect()
    }

    /// Consume into the underlying bucket vectors, Default first
    pub fn into_buckets(self) -> Vec<Vec<Record>> {
        self.buckets
    }
}
