//! Live tracking of a traveler against a selected itinerary.
//!
//! Consumes GPS fixes, maintains the traveled/remaining split and detects
//! arrival. Updates are throttled and applied in fix-arrival order; a
//! dropped fix never rolls state back.

use geo::{LineString, Point};
use log::{debug, trace};

use crate::geometry::{haversine_m, nearest_point_on_line, nearest_vertex_index};
use crate::loading::config::TrackerConfig;
use crate::routing::CalculatedRoute;

/// One GPS fix from the position stream
#[derive(Debug, Clone, Copy)]
pub struct PositionFix {
    pub lat: f64,
    pub lng: f64,
    pub timestamp_ms: u64,
}

impl PositionFix {
    pub fn new(lat: f64, lng: f64, timestamp_ms: u64) -> Self {
        Self {
            lat,
            lng,
            timestamp_ms,
        }
    }

    fn point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }
}

/// Time source for update throttling.
///
/// Injectable so tests can drive the tracker deterministically instead of
/// relying on wall-clock timers.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall-clock time since the Unix epoch
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

/// Tracking lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingPhase {
    Inactive,
    Tracking,
    Completed,
}

/// Snapshot of navigation progress, owned exclusively by the tracker while
/// navigation is active.
#[derive(Debug, Clone)]
pub struct ActiveNavigationState {
    pub route: Option<CalculatedRoute>,
    pub current_segment_index: usize,
    pub current_step_index: usize,
    /// Coordinates already covered, ending at the latest accepted fix
    pub traveled_path: Option<LineString<f64>>,
    pub remaining_route: Option<CalculatedRoute>,
    pub is_active: bool,
}

impl ActiveNavigationState {
    fn inactive() -> Self {
        Self {
            route: None,
            current_segment_index: 0,
            current_step_index: 0,
            traveled_path: None,
            remaining_route: None,
            is_active: false,
        }
    }
}

/// Tracks a position stream against the selected route.
pub struct NavigationTracker<C: Clock = SystemClock> {
    state: ActiveNavigationState,
    phase: TrackingPhase,
    config: TrackerConfig,
    clock: C,
    last_accepted_ms: Option<u64>,
}

impl NavigationTracker<SystemClock> {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> NavigationTracker<C> {
    pub fn with_clock(config: TrackerConfig, clock: C) -> Self {
        Self {
            state: ActiveNavigationState::inactive(),
            phase: TrackingPhase::Inactive,
            config,
            clock,
            last_accepted_ms: None,
        }
    }

    pub fn phase(&self) -> TrackingPhase {
        self.phase
    }

    pub fn state(&self) -> &ActiveNavigationState {
        &self.state
    }

    /// Start tracking the given route. Discards any previous session,
    /// including a completed one.
    pub fn begin_navigation(&mut self, route: CalculatedRoute) {
        self.state = ActiveNavigationState {
            remaining_route: Some(route.clone()),
            route: Some(route),
            is_active: true,
            ..ActiveNavigationState::inactive()
        };
        self.phase = TrackingPhase::Tracking;
        self.last_accepted_ms = None;
        debug!("Navigation started");
    }

    /// Cancel tracking and reset to inactive. In-flight work for the
    /// superseded route is discarded, never merged into a later session.
    pub fn end_navigation(&mut self) {
        self.state = ActiveNavigationState::inactive();
        self.phase = TrackingPhase::Inactive;
        self.last_accepted_ms = None;
        debug!("Navigation ended");
    }

    /// Apply one GPS fix and return the updated state.
    ///
    /// Fixes are dropped without mutating state when the tracker is not in
    /// the Tracking phase, when the throttle interval has not elapsed, or
    /// when the fix is farther than the off-route threshold from the
    /// itinerary (a fix exactly at the threshold is accepted).
    pub fn on_position_update(&mut self, fix: PositionFix) -> &ActiveNavigationState {
        if self.phase != TrackingPhase::Tracking {
            return &self.state;
        }

        let now = self.clock.now_ms();
        if let Some(last) = self.last_accepted_ms {
            if now.saturating_sub(last) < self.config.min_update_interval_ms {
                trace!("Fix at {} dropped by throttle", fix.timestamp_ms);
                return &self.state;
            }
        }

        let Some(route) = self.state.route.clone() else {
            return &self.state;
        };
        let line = route.full_geometry();
        if line.0.is_empty() {
            return &self.state;
        }

        let Some((_, distance_to_route_m)) = nearest_point_on_line(&line, fix.point()) else {
            return &self.state;
        };
        if distance_to_route_m > self.config.off_route_threshold_m {
            trace!(
                "Fix at ({}, {}) is {distance_to_route_m:.0} m off route - ignored",
                fix.lat, fix.lng
            );
            return &self.state;
        }

        let nearest_index = nearest_vertex_index(&line, fix.point()).unwrap_or(0);

        let mut traveled: Vec<_> = line.0[..=nearest_index].to_vec();
        traveled.push(geo::Coord {
            x: fix.lng,
            y: fix.lat,
        });

        self.state.traveled_path = Some(LineString::new(traveled));
        self.state.current_segment_index = segment_index_for(&route, nearest_index);
        self.state.remaining_route = Some(route.clone());
        self.last_accepted_ms = Some(now);

        // Arrival check runs against the final coordinate, independent of
        // the nearest-vertex bookkeeping above.
        let final_coord = Point::from(*line.0.last().expect("non-empty polyline"));
        if haversine_m(fix.point(), final_coord) < self.config.waypoint_threshold_m {
            self.state.is_active = false;
            self.state.current_segment_index = route.segments.len().saturating_sub(1);
            self.phase = TrackingPhase::Completed;
            debug!("Arrival detected");
        }

        &self.state
    }
}

/// Segment containing the polyline vertex at `coordinate_index`, derived by
/// walking cumulative per-segment coordinate counts.
fn segment_index_for(route: &CalculatedRoute, coordinate_index: usize) -> usize {
    let mut count = 0;
    for (idx, segment) in route.segments.iter().enumerate() {
        count += segment.geometry.0.len();
        if coordinate_index < count {
            return idx;
        }
    }
    route.segments.len().saturating_sub(1)
}
