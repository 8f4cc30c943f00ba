//! Builds the per-turn [`LocationContext`] from a parsed message and the
//! optional mapping collaborator.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::location::{known_places, parser};
use crate::maps::{MapsClient, RouteEndpoint};
use crate::models::location::{GeoPoint, LocationContext, CURRENT_LOCATION};

const MAX_NEARBY_PLACES: usize = 5;

#[derive(Clone)]
pub struct LocationContextBuilder {
    maps: Option<Arc<dyn MapsClient>>,
}

impl LocationContextBuilder {
    pub fn new(maps: Option<Arc<dyn MapsClient>>) -> Self {
        Self { maps }
    }

    /// Assembles a context for one message. Every collaborator call is
    /// isolated: a directions failure must not prevent the nearby-places
    /// lookup or vice versa, and the builder itself never fails.
    pub async fn build(
        &self,
        message: &str,
        user_location: Option<GeoPoint>,
    ) -> LocationContext {
        let mut extracted = parser::parse(message);

        // Fallback for messages the rule pipeline misses: a known place
        // mentioned anywhere in the text becomes the destination.
        let mut destination_from_scan = false;
        if extracted.destination.is_none() {
            if let Some(place) = known_places::scan_for_known_place(message) {
                debug!(place = %place, "known-place scan supplied destination");
                extracted.destination = Some(place);
                destination_from_scan = true;
                if extracted.origin.is_none() {
                    extracted.origin = Some(CURRENT_LOCATION.to_string());
                }
            }
        }

        let has_valid_location = user_location.is_some_and(|point| point.is_valid());
        let mut context = LocationContext {
            user_location,
            extracted_locations: extracted,
            route_info: None,
            nearby_places: None,
            has_valid_location,
        };

        let Some(maps) = &self.maps else {
            return context;
        };

        // A destination recovered by the scan is only a suggestion; resolve
        // it through the geocoder so the route query gets a real address.
        if destination_from_scan {
            if let Some(destination) = context.extracted_locations.destination.clone() {
                match maps.geocode(&destination).await {
                    Ok(Some(named)) => {
                        debug!(address = %named.address, "geocoded scanned destination");
                        context.extracted_locations.destination = Some(named.address);
                    }
                    Ok(None) => {}
                    Err(err) => warn!(error = %err, "geocode lookup failed"),
                }
            }
        }

        if let (Some(origin), Some(destination)) = (
            context.extracted_locations.origin.as_deref(),
            context.extracted_locations.destination.as_deref(),
        ) {
            let origin_endpoint = route_origin(origin, user_location);
            let destination_query = known_places::normalize_location_name(destination);

            match maps
                .transit_directions(&origin_endpoint, &destination_query)
                .await
            {
                Ok(route) => context.route_info = route,
                Err(err) => warn!(error = %err, "directions lookup failed"),
            }
        }

        if let Some(point) = user_location.filter(GeoPoint::is_valid) {
            match maps.nearby_transit(point).await {
                Ok(places) => {
                    context.nearby_places = places.map(|mut list| {
                        list.truncate(MAX_NEARBY_PLACES);
                        list
                    });
                }
                Err(err) => warn!(error = %err, "nearby-places lookup failed"),
            }
        }

        context
    }
}

/// The sentinel origin is swapped for GPS coordinates when they are present;
/// otherwise the sentinel text goes through as-is and the collaborator does
/// what it can with it.
fn route_origin(origin: &str, user_location: Option<GeoPoint>) -> RouteEndpoint {
    if origin == CURRENT_LOCATION {
        if let Some(point) = user_location.filter(GeoPoint::is_valid) {
            return RouteEndpoint::Coordinates(point);
        }
    }
    RouteEndpoint::Address(known_places::normalize_location_name(origin))
}
