//! Data model for the routable transit network

pub mod network;
pub mod types;

pub use network::TransitGraph;
pub use types::{FareZone, GraphEdge, GraphNode, NodeId, NodeKind, TravelMode, VehicleType};
