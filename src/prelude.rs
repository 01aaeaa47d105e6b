//! Convenient single import for consumers of the crate

pub use crate::directions::{WalkingDirections, WalkingRoute};
pub use crate::error::Error;
pub use crate::loading::{
    NetworkConfig, SpeedProfile, StaticSource, TrackerConfig, TransitDataSource, ZoneConfig,
    build_graph,
};
pub use crate::model::{TransitGraph, TravelMode, VehicleType};
pub use crate::navigation::{NavigationTracker, PositionFix, TrackingPhase};
pub use crate::routing::{
    CalculatedRoute, Criterion, RoutePlanner, RouteTag, TripEndpoint, TripPlan, shortest_path,
};
