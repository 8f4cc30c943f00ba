//! Heuristic extraction of origin/destination phrases from free text.
//!
//! The rule order below is load-bearing: earlier rules win when several
//! could fire, and downstream consumers (route lookup, journey planning)
//! depend on that ordering staying stable.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::location::{ExtractedLocations, CURRENT_LOCATION};

// Rule 1: "from <A> to <B>", non-greedy on <A>.
static FROM_TO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bfrom\s+(.+?)\s+to\s+(.+)").expect("valid from/to regex")
});

// Rule 2: travel-intent phrases. Longer phrases first so that e.g.
// "want to go to" is not swallowed by the bare "go to" alternative.
static TRAVEL_INTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:want to go to|going to|go to|route me to|get to|travel to)\s+(.+)")
        .expect("valid travel-intent regex")
});

// Rule 3: explicit destination statements.
static DESTINATION_IS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:my destination is|destination is)\s+(.+)")
        .expect("valid destination regex")
});

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static LEADING_THE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^the\s+").expect("valid leading-the regex"));

/// Parses a user message into a best-guess `{origin, destination}` pair.
///
/// Pure and total: never fails, absent fields come back as `None`. Matching
/// is case-insensitive but the captured text keeps the caller's casing.
pub fn parse(message: &str) -> ExtractedLocations {
    let mut locations = ExtractedLocations::default();

    if let Some(caps) = FROM_TO.captures(message) {
        locations.origin = non_empty(caps[1].trim());
        locations.destination = non_empty(caps[2].trim());
    } else if let Some(caps) = TRAVEL_INTENT.captures(message) {
        locations.origin = Some(CURRENT_LOCATION.to_string());
        locations.destination = non_empty(caps[1].trim());
    } else if let Some(caps) = DESTINATION_IS.captures(message) {
        locations.destination = non_empty(caps[1].trim());
    }

    if let Some(destination) = locations.destination.take() {
        locations.destination = Some(normalize_destination(&destination));
    }

    // Safety pass: a destination without an origin defaults to the sentinel.
    if locations.destination.is_some() && locations.origin.is_none() {
        locations.origin = Some(CURRENT_LOCATION.to_string());
    }

    locations
}

/// Strips a leading "the", collapses whitespace, and canonicalizes any
/// station-like phrase to the one station the city cares about.
fn normalize_destination(raw: &str) -> String {
    let collapsed = WHITESPACE.replace_all(raw.trim(), " ");
    let stripped = LEADING_THE.replace(&collapsed, "");

    if stripped.to_lowercase().contains("station") {
        return "pune railway station".to_string();
    }

    stripped.into_owned()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
