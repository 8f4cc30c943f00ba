//! Deterministic stand-in for a real transit feed.
//!
//! Holds small fixed tables of bus/metro/ride/bike options and produces
//! journey plans and status summaries from them. Treated as an external
//! collaborator with a fixed contract; the interesting logic lives elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MAX_JOURNEY_OPTIONS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyPreferences {
    #[serde(default)]
    pub exclude_bus: bool,
    #[serde(default)]
    pub exclude_metro: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyStep {
    pub transport: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_info: Option<String>,
    pub instruction: String,
    pub duration: u32,
    pub cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyOption {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub transport_modes: Vec<String>,
    pub total_duration: u32,
    pub total_cost: f64,
    pub reliability: u32,
    pub steps: Vec<JourneyStep>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyPlan {
    pub origin: String,
    pub destination: String,
    pub search_time: DateTime<Utc>,
    pub recommended_option: JourneyOption,
    pub all_options: Vec<JourneyOption>,
    pub preferences: JourneyPreferences,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_departure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportStatus {
    pub buses: Vec<ServiceStatus>,
    pub metros: Vec<ServiceStatus>,
    pub rides: Vec<ServiceStatus>,
    pub bikes: Vec<ServiceStatus>,
}

struct BusRoute {
    id: &'static str,
    route_number: &'static str,
    service_name: &'static str,
    origin: &'static str,
    next_departures: [&'static str; 3],
    duration: u32,
    cost: f64,
    status: &'static str,
}

struct MetroRoute {
    id: &'static str,
    line_name: &'static str,
    service_name: &'static str,
    origin: &'static str,
    next_departures: [&'static str; 3],
    duration: u32,
    cost: f64,
    status: &'static str,
}

struct RideOption {
    id: &'static str,
    service_name: &'static str,
    driver_name: &'static str,
    estimated_arrival: &'static str,
    status: &'static str,
}

struct BikeStation {
    id: &'static str,
    station_name: &'static str,
    available_bikes: u32,
    status: &'static str,
}

const BUS_ROUTES: &[BusRoute] = &[
    BusRoute {
        id: "bus-001",
        route_number: "42A",
        service_name: "City Bus",
        origin: "Downtown Station",
        next_departures: ["5 min", "15 min", "25 min"],
        duration: 35,
        cost: 2.50,
        status: "on-time",
    },
    BusRoute {
        id: "bus-002",
        route_number: "15B",
        service_name: "Express Bus",
        origin: "City Center",
        next_departures: ["8 min", "18 min", "28 min"],
        duration: 22,
        cost: 3.00,
        status: "delayed",
    },
];

const METRO_ROUTES: &[MetroRoute] = &[
    MetroRoute {
        id: "metro-001",
        line_name: "Red Line",
        service_name: "Metro Rail",
        origin: "Central Hub",
        next_departures: ["3 min", "9 min", "15 min"],
        duration: 18,
        cost: 3.25,
        status: "on-time",
    },
    MetroRoute {
        id: "metro-002",
        line_name: "Blue Line",
        service_name: "Metro Rail",
        origin: "Downtown",
        next_departures: ["6 min", "16 min", "26 min"],
        duration: 28,
        cost: 3.25,
        status: "on-time",
    },
];

const RIDE_OPTIONS: &[RideOption] = &[
    RideOption {
        id: "ride-001",
        service_name: "UberX",
        driver_name: "Ravi",
        estimated_arrival: "4 min",
        status: "available",
    },
    RideOption {
        id: "ride-002",
        service_name: "Ola Mini",
        driver_name: "Sneha",
        estimated_arrival: "7 min",
        status: "available",
    },
];

const BIKE_STATIONS: &[BikeStation] = &[
    BikeStation {
        id: "bike-001",
        station_name: "Park Avenue Station",
        available_bikes: 12,
        status: "active",
    },
    BikeStation {
        id: "bike-002",
        station_name: "Main Street Hub",
        available_bikes: 5,
        status: "active",
    },
];

#[derive(Clone, Default)]
pub struct JourneyPlanner;

impl JourneyPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Produces the fixed journey option set for a requested trip, sorted
    /// ascending by total duration and capped at five entries. The first
    /// option is the recommendation.
    pub fn plan_journey(
        &self,
        origin: &str,
        destination: &str,
        preferences: &JourneyPreferences,
    ) -> JourneyPlan {
        let mut options = Vec::new();

        if !preferences.exclude_bus {
            for route in BUS_ROUTES {
                options.push(JourneyOption {
                    id: format!("journey-{}", route.id),
                    kind: "single-mode".to_string(),
                    transport_modes: vec!["bus".to_string()],
                    total_duration: route.duration,
                    total_cost: route.cost,
                    reliability: 85,
                    steps: vec![JourneyStep {
                        transport: "bus".to_string(),
                        service_name: Some(route.service_name.to_string()),
                        route_info: Some(route.route_number.to_string()),
                        instruction: format!(
                            "Take {} from {}",
                            route.route_number, route.origin
                        ),
                        duration: route.duration,
                        cost: route.cost,
                        departure_time: Some(route.next_departures[0].to_string()),
                        status: Some(route.status.to_string()),
                    }],
                });
            }
        }

        if !preferences.exclude_metro {
            for route in METRO_ROUTES {
                options.push(JourneyOption {
                    id: format!("journey-{}", route.id),
                    kind: "single-mode".to_string(),
                    transport_modes: vec!["metro".to_string()],
                    total_duration: route.duration,
                    total_cost: route.cost,
                    reliability: 92,
                    steps: vec![JourneyStep {
                        transport: "metro".to_string(),
                        service_name: Some(route.service_name.to_string()),
                        route_info: Some(route.line_name.to_string()),
                        instruction: format!("Take {} from {}", route.line_name, route.origin),
                        duration: route.duration,
                        cost: route.cost,
                        departure_time: Some(route.next_departures[0].to_string()),
                        status: Some(route.status.to_string()),
                    }],
                });
            }
        }

        options.push(multi_modal_option());

        // Stable sort keeps insertion order between equal durations.
        options.sort_by_key(|option| option.total_duration);
        options.truncate(MAX_JOURNEY_OPTIONS);

        JourneyPlan {
            origin: origin.to_string(),
            destination: destination.to_string(),
            search_time: Utc::now(),
            recommended_option: options[0].clone(),
            all_options: options,
            preferences: preferences.clone(),
        }
    }

    /// Flattened per-mode status snapshot.
    pub fn transport_status(&self) -> TransportStatus {
        TransportStatus {
            buses: BUS_ROUTES
                .iter()
                .map(|route| ServiceStatus {
                    id: route.id.to_string(),
                    name: route.route_number.to_string(),
                    status: route.status.to_string(),
                    next_departure: Some(route.next_departures[0].to_string()),
                    available: None,
                })
                .collect(),
            metros: METRO_ROUTES
                .iter()
                .map(|route| ServiceStatus {
                    id: route.id.to_string(),
                    name: route.line_name.to_string(),
                    status: route.status.to_string(),
                    next_departure: Some(route.next_departures[0].to_string()),
                    available: None,
                })
                .collect(),
            rides: RIDE_OPTIONS
                .iter()
                .map(|ride| ServiceStatus {
                    id: ride.id.to_string(),
                    name: format!("{} ({})", ride.service_name, ride.driver_name),
                    status: ride.status.to_string(),
                    next_departure: Some(ride.estimated_arrival.to_string()),
                    available: None,
                })
                .collect(),
            bikes: BIKE_STATIONS
                .iter()
                .map(|station| ServiceStatus {
                    id: station.id.to_string(),
                    name: station.station_name.to_string(),
                    status: station.status.to_string(),
                    next_departure: None,
                    available: Some(format!("{} bikes", station.available_bikes)),
                })
                .collect(),
        }
    }
}

fn multi_modal_option() -> JourneyOption {
    JourneyOption {
        id: "journey-multimodal-001".to_string(),
        kind: "multi-modal".to_string(),
        transport_modes: vec!["bus".to_string(), "metro".to_string()],
        total_duration: 32,
        total_cost: 5.75,
        reliability: 88,
        steps: vec![
            JourneyStep {
                transport: "bus".to_string(),
                service_name: Some("City Bus".to_string()),
                route_info: Some("42A".to_string()),
                instruction: "Take Bus 42A to Metro Station".to_string(),
                duration: 12,
                cost: 2.50,
                departure_time: Some("5 min".to_string()),
                status: Some("on-time".to_string()),
            },
            JourneyStep {
                transport: "walk".to_string(),
                service_name: None,
                route_info: None,
                instruction: "Walk to Metro platform".to_string(),
                duration: 3,
                cost: 0.0,
                departure_time: None,
                status: None,
            },
            JourneyStep {
                transport: "metro".to_string(),
                service_name: Some("Metro Rail".to_string()),
                route_info: Some("Red Line".to_string()),
                instruction: "Take Red Line to destination".to_string(),
                duration: 17,
                cost: 3.25,
                departure_time: Some("3 min".to_string()),
                status: Some("on-time".to_string()),
            },
        ],
    }
}
