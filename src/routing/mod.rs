//! Routing decision tiers
//!
//! A record flows through a tiered decision strategy: deterministic direct
//! keyword match, model-assisted match, heuristic fallback match, Default.
//! The [`engine::ContentRouter`] sequences the tiers; the other modules are
//! the individual strategies and their plumbing.

pub mod decoder;
pub mod direct;
pub mod engine;
pub mod fallback;
pub mod prompt;
pub mod schema;

pub use decoder::{decode, DecodedSelection};
pub use direct::try_direct_match;
pub use engine::ContentRouter;
pub use fallback::fallback_match;
pub use prompt::build_routing_prompt;
pub use schema::RouteSelection;
