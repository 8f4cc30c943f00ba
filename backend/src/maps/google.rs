//! Google Maps Web Services client: directions, nearby search, geocoding.
//! Keyed by a single API credential configured at deploy time.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::maps::{MapsClient, RouteEndpoint};
use crate::models::location::{GeoPoint, NamedLocation, NearbyPlace, RouteInfo, TransitLeg};

#[derive(Clone)]
pub struct GoogleMapsClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl GoogleMapsClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl MapsClient for GoogleMapsClient {
    async fn transit_directions(
        &self,
        origin: &RouteEndpoint,
        destination: &str,
    ) -> Result<Option<RouteInfo>, AppError> {
        let response = self
            .http
            .get(self.endpoint("/maps/api/directions/json"))
            .query(&[
                ("origin", origin.to_query().as_str()),
                ("destination", destination),
                ("mode", "transit"),
                ("transit_mode", "bus|subway|train"),
                ("alternatives", "true"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::MapsClientError(format!("directions request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::MapsClientError(format!(
                "directions request returned {}",
                response.status()
            )));
        }

        let body: DirectionsResponse = response
            .json()
            .await
            .map_err(|e| AppError::MapsClientError(format!("directions response parse: {e}")))?;

        if body.status != "OK" {
            debug!(status = %body.status, "directions request had no usable route");
            return Ok(None);
        }

        Ok(route_info_from_directions(&body))
    }

    async fn nearby_transit(
        &self,
        location: GeoPoint,
    ) -> Result<Option<Vec<NearbyPlace>>, AppError> {
        let location_query = format!("{},{}", location.lat, location.lng);
        let response = self
            .http
            .get(self.endpoint("/maps/api/place/nearbysearch/json"))
            .query(&[
                ("location", location_query.as_str()),
                ("radius", "1000"),
                ("type", "transit_station"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::MapsClientError(format!("places request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::MapsClientError(format!(
                "places request returned {}",
                response.status()
            )));
        }

        let body: PlacesResponse = response
            .json()
            .await
            .map_err(|e| AppError::MapsClientError(format!("places response parse: {e}")))?;

        if body.status != "OK" {
            debug!(status = %body.status, "nearby search had no results");
            return Ok(None);
        }

        Ok(Some(nearby_places_from_results(body.results)))
    }

    async fn geocode(&self, address: &str) -> Result<Option<NamedLocation>, AppError> {
        let response = self
            .http
            .get(self.endpoint("/maps/api/geocode/json"))
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::MapsClientError(format!("geocode request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::MapsClientError(format!(
                "geocode request returned {}",
                response.status()
            )));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| AppError::MapsClientError(format!("geocode response parse: {e}")))?;

        Ok(body.results.into_iter().next().map(|result| NamedLocation {
            point: result.geometry.location,
            address: result.formatted_address,
        }))
    }
}

// --- Wire types (subset of the Google responses we actually read) ---

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: Option<TextValue>,
    duration: Option<TextValue>,
    start_address: Option<String>,
    end_address: Option<String>,
    #[serde(default)]
    steps: Vec<DirectionsStep>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsStep {
    travel_mode: Option<String>,
    duration: Option<TextValue>,
    transit_details: Option<TransitDetails>,
}

#[derive(Debug, Deserialize)]
struct TransitDetails {
    line: Option<TransitLine>,
    departure_stop: Option<NamedStop>,
    arrival_stop: Option<NamedStop>,
}

#[derive(Debug, Deserialize)]
struct TransitLine {
    name: Option<String>,
    short_name: Option<String>,
    vehicle: Option<TransitVehicle>,
}

#[derive(Debug, Deserialize)]
struct TransitVehicle {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedStop {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    #[serde(default)]
    types: Vec<String>,
    rating: Option<f64>,
    vicinity: Option<String>,
    geometry: PlaceGeometry,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: GeoPoint,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: PlaceGeometry,
}

fn route_info_from_directions(body: &DirectionsResponse) -> Option<RouteInfo> {
    let route = body.routes.first()?;
    let leg = route.legs.first()?;

    let transit_details = leg
        .steps
        .iter()
        .filter(|step| step.travel_mode.as_deref() == Some("TRANSIT"))
        .map(|step| {
            let transit = step.transit_details.as_ref();
            let line = transit.and_then(|t| t.line.as_ref());
            TransitLeg {
                mode: line
                    .and_then(|l| l.vehicle.as_ref())
                    .and_then(|v| v.kind.clone())
                    .unwrap_or_default(),
                line_name: line
                    .and_then(|l| l.name.clone().or_else(|| l.short_name.clone()))
                    .unwrap_or_default(),
                departure: transit
                    .and_then(|t| t.departure_stop.as_ref())
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
                arrival: transit
                    .and_then(|t| t.arrival_stop.as_ref())
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
                duration: step
                    .duration
                    .as_ref()
                    .map(|d| d.text.clone())
                    .unwrap_or_default(),
            }
        })
        .collect();

    Some(RouteInfo {
        distance: leg.distance.as_ref().map(|d| d.text.clone()).unwrap_or_default(),
        duration: leg.duration.as_ref().map(|d| d.text.clone()).unwrap_or_default(),
        start_address: leg.start_address.clone().unwrap_or_default(),
        end_address: leg.end_address.clone().unwrap_or_default(),
        transit_details,
        alternatives: body.routes.len(),
    })
}

fn nearby_places_from_results(results: Vec<PlaceResult>) -> Vec<NearbyPlace> {
    results
        .into_iter()
        .map(|place| NearbyPlace {
            name: place.name,
            kind: place.types.into_iter().next().unwrap_or_default(),
            rating: place.rating,
            vicinity: place.vicinity,
            location: place.geometry.location,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directions_into_route_info() {
        let body: DirectionsResponse = serde_json::from_str(
            r#"{
                "status": "OK",
                "routes": [
                    {
                        "legs": [
                            {
                                "distance": {"text": "12.4 km"},
                                "duration": {"text": "48 mins"},
                                "start_address": "Dighi, Pune",
                                "end_address": "Pune Airport",
                                "steps": [
                                    {"travel_mode": "WALKING", "duration": {"text": "5 mins"}},
                                    {
                                        "travel_mode": "TRANSIT",
                                        "duration": {"text": "35 mins"},
                                        "transit_details": {
                                            "line": {
                                                "name": "Alandi Road Line",
                                                "short_name": "42A",
                                                "vehicle": {"type": "BUS"}
                                            },
                                            "departure_stop": {"name": "Dighi Stop"},
                                            "arrival_stop": {"name": "Airport Stop"}
                                        }
                                    }
                                ]
                            }
                        ]
                    },
                    {"legs": []}
                ]
            }"#,
        )
        .unwrap();

        let route = route_info_from_directions(&body).unwrap();
        assert_eq!(route.distance, "12.4 km");
        assert_eq!(route.duration, "48 mins");
        assert_eq!(route.start_address, "Dighi, Pune");
        assert_eq!(route.alternatives, 2);
        assert_eq!(route.transit_details.len(), 1);
        assert_eq!(route.transit_details[0].mode, "BUS");
        assert_eq!(route.transit_details[0].line_name, "Alandi Road Line");
        assert_eq!(route.transit_details[0].departure, "Dighi Stop");
    }

    #[test]
    fn no_routes_yields_none() {
        let body = DirectionsResponse {
            status: "ZERO_RESULTS".to_string(),
            routes: vec![],
        };
        assert!(route_info_from_directions(&body).is_none());
    }

    #[test]
    fn parses_nearby_results() {
        let body: PlacesResponse = serde_json::from_str(
            r#"{
                "status": "OK",
                "results": [
                    {
                        "name": "Shivajinagar Bus Stand",
                        "types": ["bus_station", "transit_station"],
                        "rating": 4.1,
                        "vicinity": "Shivajinagar",
                        "geometry": {"location": {"lat": 18.53, "lng": 73.85}}
                    }
                ]
            }"#,
        )
        .unwrap();

        let places = nearby_places_from_results(body.results);
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].kind, "bus_station");
        assert_eq!(places[0].rating, Some(4.1));
    }
}
