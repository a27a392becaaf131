//! AI Router - per-item content routing
//!
//! Given a batch of records and a set of named, described routes, the router
//! decides for each record which single downstream branch it flows to. The
//! decision is delegated to an externally supplied language-model capability,
//! with deterministic and heuristic keyword strategies around it:
//!
//! 1. Direct keyword match (`has word <X>` in a route description) — a
//!    deterministic override that bypasses the model entirely.
//! 2. Model-assisted match through whichever calling convention the supplied
//!    capability exposes, with the answer decoded tolerantly.
//! 3. Fallback keyword match when the model is unavailable or fails.
//! 4. The implicit Default route (index 0) when nothing else applies.
//!
//! # Quick Start
//!
//! ```rust
//! use ai_router::config::RouterConfig;
//! use ai_router::record::{Record, Route};
//! use ai_router::routing::ContentRouter;
//! use ai_router::testing::MockModelCapability;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = RouterConfig::from_toml_str("")?;
//! config.routes = vec![
//!     Route::new("Billing", "has word 'invoice'"),
//!     Route::new("Support", "help requests and complaints"),
//! ];
//! config.router.analysis_field = "message".to_string();
//!
//! let model = Arc::new(MockModelCapability::single_response("2"));
//! let router = ContentRouter::new(config).with_model(model);
//!
//! let records = vec![
//!     Record::new(json!({"message": "please send the invoice"})),
//!     Record::new(json!({"message": "my app is broken"})),
//! ];
//!
//! let buckets = router.route_batch(records).await?;
//! assert_eq!(buckets.route_bucket(1).unwrap().len(), 1); // direct keyword
//! assert_eq!(buckets.route_bucket(2).unwrap().len(), 1); // model decision
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod observability;
pub mod record;
pub mod resolve;
pub mod routing;
pub mod testing;

pub use config::{FailurePolicy, ResponseFormat, RouterConfig};
pub use error::{RouterError, RouterResult};
pub use model::{CallConvention, ChatMessage, ModelCapability, ModelError};
pub use record::{MatchType, Record, Route, RouteBuckets, RoutingOutcome};
pub use resolve::resolve_content;
pub use routing::ContentRouter;
