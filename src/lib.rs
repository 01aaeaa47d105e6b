//! Multi-modal trip planning and live tracking for informal transit
//! networks (jeepneys, tricycles, e-jeeps, buses without fixed schedules).
//!
//! The crate builds a routable graph from persisted stop/route/zone records,
//! computes least-cost paths under time, distance and fare criteria,
//! stitches walking and riding segments into complete tagged itineraries,
//! resolves flat-fare zone shortcuts, and projects a live GPS stream onto an
//! active itinerary to report progress.
//!
//! It is a computational library consumed in-process: persistence, map
//! rendering and turn-by-turn walking directions live behind the
//! [`loading::TransitDataSource`] and [`directions::WalkingDirections`]
//! collaborator traits.

pub mod directions;
pub mod error;
pub mod geometry;
pub mod loading;
pub mod model;
pub mod navigation;
pub mod prelude;
pub mod routing;

pub use error::Error;

// Re-export key components
pub use directions::{WalkingDirections, WalkingRoute};
pub use loading::{
    NetworkConfig, RouteRecord, SpeedProfile, StaticSource, StopRecord, TrackerConfig,
    TransitDataSource, ZoneConfig, ZoneRecord, build_graph,
};
pub use model::{
    FareZone, GraphEdge, GraphNode, NodeId, NodeKind, TransitGraph, TravelMode, VehicleType,
};
pub use navigation::{
    ActiveNavigationState, Clock, NavigationTracker, PositionFix, SystemClock, TrackingPhase,
};
pub use routing::{
    CalculatedRoute, Criterion, PathResult, RoutePlanner, RouteSegment, RouteTag, SegmentEndpoint,
    TripEndpoint, TripPlan, shortest_path,
};
