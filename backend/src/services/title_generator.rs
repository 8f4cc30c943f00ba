//! Best-effort conversation titles from the first exchange.
//!
//! Runs exactly once per conversation, right after the first AI reply; later
//! messages never retitle a chat. Heuristics are tried in a fixed order and
//! the last one always produces something.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::location::known_places;

const MAX_TITLE_LEN: usize = 25;
const FALLBACK_WORD_COUNT: usize = 4;

static ROUTE_FROM_TO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\broute from\s+(.+?)\s+to\s+([^.!?\n]+)").expect("valid route regex")
});

static DESTINATION_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:to reach|getting to|travel to)\s+([^,.\n]+)")
        .expect("valid destination-phrase regex")
});

/// Derives a short title from the first user message and the AI reply to it.
pub fn generate_title(user_message: &str, ai_response: &str) -> String {
    // 1. Explicit route statement in the AI text.
    if let Some(caps) = ROUTE_FROM_TO.captures(ai_response) {
        let from = capitalize_location(caps[1].trim());
        let to = capitalize_location(caps[2].trim());
        return format!("{from} → {to}");
    }

    // 2. Destination phrase in the AI text.
    if let Some(caps) = DESTINATION_PHRASE.captures(ai_response) {
        let destination = capitalize_location(caps[1].trim());
        return format!("Route to {destination}");
    }

    // 3. Transport-mode keyword buckets.
    let response = ai_response.to_lowercase();
    if response.contains("bus") && (response.contains("route") || response.contains("service")) {
        return "Bus Routes".to_string();
    }
    if response.contains("metro") || response.contains("train") {
        return "Metro/Train Info".to_string();
    }
    if response.contains("taxi") || response.contains("auto") {
        return "Taxi/Auto Info".to_string();
    }

    // 4. Known location names mentioned in the AI text.
    let mentions = known_location_mentions(ai_response);
    match mentions.as_slice() {
        [first, second, ..] => return format!("{first} → {second}"),
        [only] => return format!("{only} Journey"),
        [] => {}
    }

    // 5. Fall back to the start of the user's message.
    fallback_title(user_message)
}

/// Up to two known place names, in order of appearance in the text.
fn known_location_mentions(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    let mut hits: Vec<(usize, &'static str)> = Vec::new();

    for &(key, display) in known_places::KNOWN_PLACES {
        if let Some(index) = lower.find(key) {
            if !hits.iter().any(|&(_, seen)| seen == display) {
                hits.push((index, display));
            }
        }
    }

    hits.sort_by_key(|(index, _)| *index);
    hits.into_iter().map(|(_, display)| display).take(2).collect()
}

fn fallback_title(user_message: &str) -> String {
    let title = user_message
        .split_whitespace()
        .take(FALLBACK_WORD_COUNT)
        .collect::<Vec<_>>()
        .join(" ");

    if title.chars().count() > MAX_TITLE_LEN {
        let truncated: String = title.chars().take(MAX_TITLE_LEN).collect();
        format!("{truncated}...")
    } else {
        title
    }
}

fn capitalize_location(location: &str) -> String {
    location
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            if lower == "to" || lower == "and" {
                return lower;
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_statement_wins() {
        let title = generate_title(
            "how do I get there",
            "The best route from dighi to pune airport. It takes about 45 minutes.",
        );
        assert_eq!(title, "Dighi → Pune Airport");
    }

    #[test]
    fn destination_phrase_forms_route_title() {
        let title = generate_title(
            "help me out",
            "To reach hinjewadi, take the 42A bus and change at Aundh.",
        );
        assert_eq!(title, "Route to Hinjewadi");
    }

    #[test]
    fn transport_buckets_apply_in_order() {
        assert_eq!(
            generate_title("x", "Several bus routes serve this corridor."),
            "Bus Routes"
        );
        assert_eq!(
            generate_title("x", "The metro is the fastest choice."),
            "Metro/Train Info"
        );
        assert_eq!(
            generate_title("x", "An auto would cost around ₹150."),
            "Taxi/Auto Info"
        );
    }

    #[test]
    fn known_locations_build_arrow_titles() {
        let title = generate_title("x", "Kharadi is well connected with Wakad by ring road.");
        assert_eq!(title, "Kharadi → Wakad");

        let title = generate_title("x", "Kharadi has several feeder options.");
        assert_eq!(title, "Kharadi Journey");
    }

    #[test]
    fn fallback_truncates_long_messages() {
        let title = generate_title(
            "please give me transportation recommendations immediately",
            "Okay.",
        );
        assert!(title.chars().count() <= MAX_TITLE_LEN + 3);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn fallback_keeps_short_messages_whole() {
        assert_eq!(generate_title("best way home", "Okay."), "best way home");
    }
}
