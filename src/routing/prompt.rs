//! Routing prompt construction

use crate::config::ResponseFormat;
use crate::record::Route;
use std::fmt::Write;

/// Build the prompt asking the model to pick a route for `content`
///
/// Routes are enumerated with their 1-based indices; 0 means none apply.
/// The closing instruction depends on the response format so index mode
/// gets a bare number and structured mode gets a JSON object back.
pub fn build_routing_prompt(content: &str, routes: &[Route], format: ResponseFormat) -> String {
    let mut prompt = String::from(
        "You are a content router that analyzes text and routes it to the most appropriate destination.\n\n",
    );
    let _ = write!(prompt, "Content to analyze: \"{content}\"\n\n");
    prompt.push_str("Available routes:\n");

    for (position, route) in routes.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}: {}", position + 1, route.name, route.description);
    }

    match format {
        ResponseFormat::Index => {
            prompt.push_str(
                "\nRespond with ONLY the number of the most appropriate route, or 0 if none apply.",
            );
        }
        ResponseFormat::Structured => {
            prompt.push_str(
                "\nRespond with a JSON object containing: { \"routeIndex\": (number), \"reasoning\": \"explanation\" }",
            );
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> Vec<Route> {
        vec![
            Route::new("Billing", "invoices and payments"),
            Route::new("Support", "help requests"),
        ]
    }

    #[test]
    fn test_enumerates_routes_one_based() {
        let prompt = build_routing_prompt("hello", &routes(), ResponseFormat::Index);
        assert!(prompt.contains("1. Billing: invoices and payments"));
        assert!(prompt.contains("2. Support: help requests"));
    }

    #[test]
    fn test_quotes_content() {
        let prompt = build_routing_prompt("send invoice", &routes(), ResponseFormat::Index);
        assert!(prompt.contains("Content to analyze: \"send invoice\""));
    }

    #[test]
    fn test_index_instruction() {
        let prompt = build_routing_prompt("x", &routes(), ResponseFormat::Index);
        assert!(prompt.contains("ONLY the number"));
        assert!(prompt.contains("0 if none apply"));
        assert!(!prompt.contains("routeIndex"));
    }

    #[test]
    fn test_structured_instruction() {
        let prompt = build_routing_prompt("x", &routes(), ResponseFormat::Structured);
        assert!(prompt.contains("\"routeIndex\""));
        assert!(prompt.contains("\"reasoning\""));
    }
}
