//! Trip planner: stitches walking legs and transit paths into complete
//! tagged itineraries.

use std::sync::atomic::{AtomicBool, Ordering};

use geo::Point;
use hashbrown::HashSet;
use log::{debug, info, warn};

use super::dijkstra::{Criterion, shortest_path};
use super::itinerary::{CalculatedRoute, RouteSegment, RouteTag, SegmentEndpoint};
use super::zones::{direct_trip, same_zone};
use crate::directions::{WalkingDirections, WalkingRoute};
use crate::error::Error;
use crate::loading::config::{NetworkConfig, ZoneConfig};
use crate::loading::{TransitDataSource, build_graph};
use crate::model::TravelMode;

/// Origin or destination of a trip request
#[derive(Debug, Clone)]
pub struct TripEndpoint {
    pub lat: f64,
    pub lng: f64,
    pub name: Option<String>,
}

impl TripEndpoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            name: None,
        }
    }

    pub fn named(lat: f64, lng: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            name: Some(name.into()),
        }
    }

    fn point(&self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }

    fn to_segment_endpoint(&self, fallback: &str) -> SegmentEndpoint {
        SegmentEndpoint::new(
            self.lat,
            self.lng,
            self.name.clone().unwrap_or_else(|| fallback.to_string()),
        )
    }
}

/// Outcome of one trip calculation.
///
/// Failures are reported here as structured data, never as panics crossing
/// the crate boundary. An empty route list with no error cannot occur: every
/// failure path carries its reason.
#[derive(Debug, Clone)]
pub struct TripPlan {
    pub routes: Vec<CalculatedRoute>,
    pub error: Option<Error>,
}

impl TripPlan {
    fn ok(routes: Vec<CalculatedRoute>) -> Self {
        Self {
            routes,
            error: None,
        }
    }

    fn failed(error: Error) -> Self {
        Self {
            routes: Vec::new(),
            error: Some(error),
        }
    }
}

/// Resets the in-flight flag even on early return
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Multi-modal trip planner over a transit data source and a walking
/// directions provider.
///
/// Each calculation rebuilds its own graph snapshot, so concurrent planners
/// never share mutable state; a single planner rejects overlapping
/// calculations instead of queuing them.
pub struct RoutePlanner<S, D> {
    source: S,
    directions: D,
    network_config: NetworkConfig,
    zone_config: ZoneConfig,
    in_flight: AtomicBool,
}

impl<S: TransitDataSource, D: WalkingDirections> RoutePlanner<S, D> {
    pub fn new(source: S, directions: D) -> Self {
        Self::with_config(source, directions, NetworkConfig::default(), ZoneConfig::default())
    }

    pub fn with_config(
        source: S,
        directions: D,
        network_config: NetworkConfig,
        zone_config: ZoneConfig,
    ) -> Self {
        Self {
            source,
            directions,
            network_config,
            zone_config,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Compute up to three tagged itineraries from `origin` to `destination`.
    ///
    /// One underlying path may be optimal under several criteria, so 1-3
    /// routes is the expected outcome, not a defect.
    pub fn calculate_routes(&self, origin: &TripEndpoint, destination: &TripEndpoint) -> TripPlan {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return TripPlan::failed(Error::CalculationInProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let graph = build_graph(&self.source, &self.network_config);

        // Same-zone trips bypass graph search entirely
        if let Some(zone) = same_zone(origin.point(), destination.point(), &graph.zones) {
            info!("Trip resolved within zone {:?} - direct estimate", zone.name);
            return TripPlan::ok(vec![direct_trip(
                origin.to_segment_endpoint("Origin"),
                destination.to_segment_endpoint("Destination"),
                zone,
                &self.zone_config,
            )]);
        }

        let Some((start_id, start_dist)) = graph.nearest_node(origin.point(), None) else {
            return TripPlan::failed(Error::NoNearbyNode {
                lat: origin.lat,
                lng: origin.lng,
            });
        };
        let Some((end_id, end_dist)) = graph.nearest_node(destination.point(), None) else {
            return TripPlan::failed(Error::NoNearbyNode {
                lat: destination.lat,
                lng: destination.lng,
            });
        };
        debug!(
            "Snapped origin to node {start_id} ({start_dist:.3} km), \
             destination to node {end_id} ({end_dist:.3} km)"
        );

        let start_node = graph.node(start_id).expect("snapped node exists").clone();
        let end_node = graph.node(end_id).expect("snapped node exists").clone();

        // First-mile and last-mile legs are independent: fetch them
        // concurrently.
        let (first_mile, last_mile) = std::thread::scope(|scope| {
            let first = scope.spawn(|| {
                self.directions
                    .walking_route(origin.point(), start_node.location)
            });
            let last = scope.spawn(|| {
                self.directions
                    .walking_route(end_node.location, destination.point())
            });
            (joined(first.join()), joined(last.join()))
        });

        let first_mile = match first_mile {
            Ok(route) => route,
            Err(e) => return TripPlan::failed(e),
        };
        let last_mile = match last_mile {
            Ok(route) => route,
            Err(e) => return TripPlan::failed(e),
        };

        let mut routes = Vec::new();
        let mut seen = HashSet::new();
        for (criterion, tag) in [
            (Criterion::Time, RouteTag::Fastest),
            (Criterion::Fare, RouteTag::Cheapest),
            (Criterion::Distance, RouteTag::Shortest),
        ] {
            let Some(path) = shortest_path(&graph, start_id, end_id, criterion) else {
                debug!(
                    "No path from {start_id} to {end_id} under criterion {}",
                    criterion.label()
                );
                continue;
            };
            debug!(
                "Criterion {}: {} hops, total {:.3}",
                criterion.label(),
                path.edges.len(),
                path.total
            );

            let mut segments = Vec::with_capacity(path.edges.len() + 2);
            segments.push(walk_segment(
                origin.to_segment_endpoint("Origin"),
                SegmentEndpoint::from_node(&start_node),
                &first_mile,
            ));
            segments.extend(super::itinerary::segments_from_path(&graph, &path));
            segments.push(walk_segment(
                SegmentEndpoint::from_node(&end_node),
                destination.to_segment_endpoint("Destination"),
                &last_mile,
            ));

            let route = CalculatedRoute::from_segments(tag, segments);
            if seen.insert(route.dedup_key()) {
                routes.push(route);
            }
        }

        if routes.is_empty() {
            warn!(
                "No itinerary between ({}, {}) and ({}, {}): nodes {start_id} -> {end_id} \
                 are not connected",
                origin.lat, origin.lng, destination.lat, destination.lng
            );
            return TripPlan::failed(Error::NoPathFound {
                from: start_id,
                to: end_id,
            });
        }

        TripPlan::ok(routes)
    }
}

fn joined(
    result: std::thread::Result<Result<WalkingRoute, Error>>,
) -> Result<WalkingRoute, Error> {
    match result {
        Ok(inner) => inner.map_err(|e| match e {
            Error::WalkingLegUnavailable(_) => e,
            other => Error::WalkingLegUnavailable(other.to_string()),
        }),
        Err(_) => Err(Error::WalkingLegUnavailable(
            "directions provider panicked".into(),
        )),
    }
}

fn walk_segment(
    start: SegmentEndpoint,
    end: SegmentEndpoint,
    route: &WalkingRoute,
) -> RouteSegment {
    RouteSegment {
        mode: TravelMode::Walk,
        start,
        end,
        distance_km: route.distance_m / 1000.0,
        duration_min: route.duration_s / 60.0,
        fare_php: None,
        geometry: route.geometry.clone(),
        instructions: route.instructions.clone(),
    }
}
