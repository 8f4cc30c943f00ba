//! Assembles the structured prompt sent to the language model.
//!
//! The output is used verbatim as the request payload, so for identical
//! inputs it must be byte-identical: fixed section order, struct-serialized
//! JSON, no timestamps.

use crate::llm::PromptMessage;
use crate::models::location::LocationContext;

const SYSTEM_PERSONA: &str = "You are Maya, an expert urban mobility assistant for Pune, India. \
You help with transportation planning including buses, trains, autos, taxis, and bike-sharing. \
Maintain conversation context and remember previous discussions.\n\
\n\
For Pune specifically:\n\
- PMPML buses: ₹5-35 depending on distance\n\
- Auto-rickshaws: ₹15-20 per km plus waiting charges\n\
- Ola/Uber: varies with surge pricing\n\
- Pune Metro: ₹10-40 depending on distance\n\
- Consider traffic patterns and peak hours (8-11 AM, 6-9 PM)\n\
\n\
Use any location context provided to give specific, actionable transport advice \
with real costs, timings, and route recommendations.";

/// Builds the ordered message list for one turn: system message first, then
/// the caller-supplied history in original order, then the current user
/// message last.
pub fn build_messages(
    current_message: &str,
    history: &[PromptMessage],
    location_context: Option<&LocationContext>,
) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(PromptMessage::system(system_content(location_context)));
    messages.extend(history.iter().cloned());
    messages.push(PromptMessage::user(current_message));
    messages
}

fn system_content(location_context: Option<&LocationContext>) -> String {
    let mut content = String::from(SYSTEM_PERSONA);

    let Some(context) = location_context else {
        return content;
    };

    let extracted = &context.extracted_locations;
    if extracted.origin.is_some() || extracted.destination.is_some() {
        // Struct serialization keeps the field order fixed.
        if let Ok(json) = serde_json::to_string(extracted) {
            content.push_str("\n\nCurrent location context: ");
            content.push_str(&json);
        }
    }

    if let Some(location) = &context.user_location {
        content.push_str(&format!(
            "\nUser's GPS location: {}, {}",
            location.lat, location.lng
        ));
    }

    if let Some(route) = &context.route_info {
        content.push_str(&format!("\nRoute distance: {}", route.distance));
        content.push_str(&format!("\nRoute duration: {}", route.duration));
        content.push_str(&format!("\nStart address: {}", route.start_address));
        content.push_str(&format!("\nEnd address: {}", route.end_address));

        if !route.transit_details.is_empty() {
            content.push_str("\nAvailable transit options:");
            for (index, leg) in route.transit_details.iter().enumerate() {
                content.push_str(&format!(
                    "\n  {}. {} - {}: {} to {} ({})",
                    index + 1,
                    leg.mode,
                    leg.line_name,
                    leg.departure,
                    leg.arrival,
                    leg.duration
                ));
            }
        }
    }

    if let Some(places) = context.nearby_places.as_deref() {
        if !places.is_empty() {
            content.push_str("\nNearby transport hubs:");
            for (index, place) in places.iter().enumerate() {
                let rating = place
                    .rating
                    .map_or_else(|| "n/a".to_string(), |r| r.to_string());
                content.push_str(&format!(
                    "\n  {}. {} ({}) - rating {}",
                    index + 1,
                    place.name,
                    place.kind,
                    rating
                ));
            }
        }
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::PromptRole;
    use crate::models::location::{
        ExtractedLocations, GeoPoint, NearbyPlace, RouteInfo, TransitLeg,
    };

    fn sample_context() -> LocationContext {
        LocationContext {
            user_location: Some(GeoPoint {
                lat: 18.5204,
                lng: 73.8567,
            }),
            extracted_locations: ExtractedLocations {
                origin: Some("Dighi".to_string()),
                destination: Some("Airport".to_string()),
            },
            route_info: Some(RouteInfo {
                distance: "12.4 km".to_string(),
                duration: "48 mins".to_string(),
                start_address: "Dighi, Pune".to_string(),
                end_address: "Pune Airport".to_string(),
                transit_details: vec![TransitLeg {
                    mode: "BUS".to_string(),
                    line_name: "42A".to_string(),
                    departure: "Dighi Stop".to_string(),
                    arrival: "Airport Stop".to_string(),
                    duration: "35 mins".to_string(),
                }],
                alternatives: 2,
            }),
            nearby_places: Some(vec![NearbyPlace {
                name: "Shivajinagar Bus Stand".to_string(),
                kind: "bus_station".to_string(),
                rating: Some(4.1),
                vicinity: None,
                location: GeoPoint {
                    lat: 18.53,
                    lng: 73.85,
                },
            }]),
            has_valid_location: true,
        }
    }

    #[test]
    fn system_message_comes_first_and_current_message_last() {
        let history = vec![
            PromptMessage::user("hello"),
            PromptMessage::assistant("Hi! Where would you like to go?"),
        ];
        let messages = build_messages("from Dighi to Airport", &history, None);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, PromptRole::System);
        assert_eq!(messages[1], history[0]);
        assert_eq!(messages[2], history[1]);
        assert_eq!(messages[3].role, PromptRole::User);
        assert_eq!(messages[3].content, "from Dighi to Airport");
    }

    #[test]
    fn identical_inputs_yield_identical_output() {
        let context = sample_context();
        let history = vec![PromptMessage::user("hi")];

        let first = build_messages("from Dighi to Airport", &history, Some(&context));
        let second = build_messages("from Dighi to Airport", &history, Some(&context));

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn context_sections_appear_when_present() {
        let context = sample_context();
        let messages = build_messages("from Dighi to Airport", &[], Some(&context));
        let system = &messages[0].content;

        assert!(system.contains("Current location context: {\"origin\":\"Dighi\",\"destination\":\"Airport\"}"));
        assert!(system.contains("User's GPS location: 18.5204, 73.8567"));
        assert!(system.contains("Route distance: 12.4 km"));
        assert!(system.contains("1. BUS - 42A: Dighi Stop to Airport Stop (35 mins)"));
        assert!(system.contains("1. Shivajinagar Bus Stand (bus_station) - rating 4.1"));
    }

    #[test]
    fn empty_context_adds_no_sections() {
        let messages = build_messages("hello", &[], None);
        let system = &messages[0].content;

        assert!(!system.contains("Current location context"));
        assert!(!system.contains("GPS location"));
    }
}
