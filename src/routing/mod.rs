//! Path search, fare zones and trip planning

pub mod dijkstra;
pub mod itinerary;
pub mod planner;
pub mod zones;

pub use dijkstra::{Criterion, PathResult, shortest_path};
pub use itinerary::{CalculatedRoute, RouteSegment, RouteTag, SegmentEndpoint};
pub use planner::{RoutePlanner, TripEndpoint, TripPlan};
pub use zones::{direct_trip, same_zone};
