//! Heuristic keyword routing after model failure
//!
//! When the model cannot be invoked, routing degrades to an approximate
//! match: any sufficiently long word from a route's name or description
//! found inside the content claims the record. This is deliberately crude;
//! it only runs when the primary decision path is gone.

use crate::record::Route;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::debug;

/// Filler words that would match almost any content
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["with", "this", "that", "when", "word", "has", "the", "and", "for", "any"]
        .into_iter()
        .collect()
});

/// Find the first route whose name/description words appear in `content`
///
/// Candidate words are the lower-cased whitespace-split tokens of the
/// route's name and description, filtered to length > 3 and to non-stop
/// words. The first route (in configured order) with any candidate
/// contained in the lower-cased content wins. Returns 0 when none match.
pub fn fallback_match(routes: &[Route], content: &str) -> usize {
    let content_lower = content.to_lowercase();

    for (position, route) in routes.iter().enumerate() {
        let name_lower = route.name.to_lowercase();
        let description_lower = route.description.to_lowercase();

        let candidates = name_lower
            .split_whitespace()
            .chain(description_lower.split_whitespace())
            .filter(|word| word.len() > 3)
            .filter(|word| !STOP_WORDS.contains(word));

        for word in candidates {
            if content_lower.contains(word) {
                let route_index = position + 1;
                debug!(word, route_index, route = %route.name, "Fallback keyword match");
                return route_index;
            }
        }
    }

    0
}
