//! Core graph and itinerary types for the transit network

use geo::{Point, Polygon};
use serde::Deserialize;

/// Stable identifier of a graph node within one snapshot
pub type NodeId = u64;

/// Vehicle classes operating in the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleType {
    Jeepney,
    Tricycle,
    EJeep,
    Bus,
}

impl VehicleType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Jeepney => "jeepney",
            Self::Tricycle => "tricycle",
            Self::EJeep => "e-jeep",
            Self::Bus => "bus",
        }
    }
}

/// How an edge or segment is traversed: on foot, or riding one vehicle.
///
/// Modeled as a tagged union so a walking transfer can never be mistaken
/// for a ride when computing fares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TravelMode {
    Walk,
    Ride(VehicleType),
}

impl TravelMode {
    pub fn is_walk(self) -> bool {
        matches!(self, Self::Walk)
    }

    pub fn vehicle(self) -> Option<VehicleType> {
        match self {
            Self::Walk => None,
            Self::Ride(v) => Some(v),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Ride(v) => v.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Terminal,
    Stop,
    Virtual,
}

/// A terminal, stop or virtual point in the routable graph
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Position as (lng, lat), matching the rest of the geometry stack
    pub location: Point<f64>,
    pub name: String,
    /// Non-empty for terminals and stops
    pub vehicle_types: Vec<VehicleType>,
}

impl GraphNode {
    pub fn lat(&self) -> f64 {
        self.location.y()
    }

    pub fn lng(&self) -> f64 {
        self.location.x()
    }
}

/// Directed, weighted connection between two nodes.
///
/// All three weights are carried on every edge so a single graph serves all
/// optimization criteria.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub mode: TravelMode,
    pub distance_km: f64,
    pub duration_min: f64,
    pub fare_php: f64,
}

/// Flat-fare franchise area (e.g. a tricycle TODA zone).
///
/// A point belongs to a zone when it lies strictly inside the polygon;
/// points exactly on the boundary are treated as outside.
#[derive(Debug, Clone)]
pub struct FareZone {
    pub id: u64,
    pub name: String,
    pub base_fare: f64,
    pub per_km: f64,
    pub polygon: Polygon<f64>,
}
