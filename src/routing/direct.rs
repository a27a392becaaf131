//! Deterministic keyword routing
//!
//! Route authors can embed a `has word <keyword>` clause in a route
//! description to claim records by exact keyword before any model is
//! consulted. When the clause fires, neither the model nor the fallback
//! matcher runs for that record.

use crate::record::Route;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Matches `has word foo`, `has word 'foo'`, `has word "foo"` in a description
static HAS_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)has\s+word\s+['"]?([a-z0-9_]+)['"]?"#).expect("static pattern")
});

/// Scan routes in configured order for a `has word` clause whose keyword
/// occurs in `content` as a whole word (case-insensitive)
///
/// Returns the 1-based index of the first matching route, or `None` when no
/// route claims the record this way. First hit wins; later routes are not
/// examined.
pub fn try_direct_match(routes: &[Route], content: &str) -> Option<usize> {
    for (position, route) in routes.iter().enumerate() {
        let keyword = match HAS_WORD
            .captures(&route.description)
            .and_then(|caps| caps.get(1))
        {
            Some(m) => m.as_str().to_lowercase(),
            None => continue,
        };

        if contains_whole_word(content, &keyword) {
            let route_index = position + 1;
            debug!(keyword = %keyword, route_index, route = %route.name, "Direct keyword match");
            return Some(route_index);
        }
    }
    None
}

/// Whole-word, case-insensitive occurrence test
fn contains_whole_word(content: &str, keyword: &str) -> bool {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
    // Keyword is [a-z0-9_]+ so the pattern is always valid
    Regex::new(&pattern)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}
