use serde::{Deserialize, Serialize};

/// Sentinel origin used when travel intent is detected without an explicit
/// origin phrase. A smart default, not a parsing failure.
pub const CURRENT_LOCATION: &str = "Current Location";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedLocation {
    #[serde(flatten)]
    pub point: GeoPoint,
    pub address: String,
}

/// Best-guess origin/destination pulled out of a free-text message.
/// Derived per message, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedLocations {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

/// One transit leg of a route, as reported by the directions collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitLeg {
    pub mode: String,
    pub line_name: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
}

/// Route summary sourced entirely from the directions collaborator; the
/// server neither computes nor validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    pub distance: String,
    pub duration: String,
    pub start_address: String,
    pub end_address: String,
    pub transit_details: Vec<TransitLeg>,
    pub alternatives: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPlace {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vicinity: Option<String>,
    pub location: GeoPoint,
}

/// The location bundle attached to a single conversational turn. Built fresh
/// per message and passed by value into the prompt builder and the wire
/// envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationContext {
    pub user_location: Option<GeoPoint>,
    pub extracted_locations: ExtractedLocations,
    pub route_info: Option<RouteInfo>,
    pub nearby_places: Option<Vec<NearbyPlace>>,
    pub has_valid_location: bool,
}

impl LocationContext {
    pub fn empty() -> Self {
        Self {
            user_location: None,
            extracted_locations: ExtractedLocations::default(),
            route_info: None,
            nearby_places: None,
            has_valid_location: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_point_validity() {
        assert!(GeoPoint { lat: 18.52, lng: 73.85 }.is_valid());
        assert!(!GeoPoint { lat: f64::NAN, lng: 73.85 }.is_valid());
        assert!(!GeoPoint { lat: 18.52, lng: f64::INFINITY }.is_valid());
    }

    #[test]
    fn location_context_uses_camel_case_on_the_wire() {
        let context = LocationContext::empty();
        let value = serde_json::to_value(&context).unwrap();
        assert!(value.get("extractedLocations").is_some());
        assert!(value.get("hasValidLocation").is_some());
        assert!(value.get("routeInfo").is_some());
    }
}
