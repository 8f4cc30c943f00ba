use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::location::{GeoPoint, NamedLocation, NearbyPlace, RouteInfo};

pub mod google;

pub use google::GoogleMapsClient;

/// One end of a directions request: either a plain-text place name or the
/// caller's GPS coordinates (used when the origin is the sentinel
/// "Current Location").
#[derive(Debug, Clone, PartialEq)]
pub enum RouteEndpoint {
    Address(String),
    Coordinates(GeoPoint),
}

impl RouteEndpoint {
    pub fn to_query(&self) -> String {
        match self {
            RouteEndpoint::Address(address) => address.clone(),
            RouteEndpoint::Coordinates(point) => format!("{},{}", point.lat, point.lng),
        }
    }
}

/// Interface to the mapping collaborator. All mapping capability is consumed,
/// never reimplemented; implementations return `Ok(None)` when the upstream
/// has no answer and `Err` only on transport-level failures.
#[async_trait]
pub trait MapsClient: Send + Sync {
    /// Transit-mode route (bus/subway/train) with alternatives enabled.
    async fn transit_directions(
        &self,
        origin: &RouteEndpoint,
        destination: &str,
    ) -> Result<Option<RouteInfo>, AppError>;

    /// Transit-related places within 1 km of the given point.
    async fn nearby_transit(
        &self,
        location: GeoPoint,
    ) -> Result<Option<Vec<NearbyPlace>>, AppError>;

    /// Address -> coordinates.
    async fn geocode(&self, address: &str) -> Result<Option<NamedLocation>, AppError>;
}
