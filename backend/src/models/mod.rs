pub mod chats;
pub mod envelope;
pub mod location;

pub use chats::{Conversation, HistoryTurn, Message, MessageKind, Sender};
pub use envelope::ResponseEnvelope;
pub use location::{
    ExtractedLocations, GeoPoint, LocationContext, NamedLocation, NearbyPlace, RouteInfo,
    TransitLeg, CURRENT_LOCATION,
};
