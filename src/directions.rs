//! External walking-directions collaborator.
//!
//! The core never computes turn-by-turn walking routes itself; a provider
//! (in production, a hosted directions API) returns a polyline, distance and
//! duration for two points. Request timeouts are the provider's
//! responsibility, not reimplemented here.

use geo::{LineString, Point};

use crate::error::Error;

/// Walking route between two points, as returned by the provider
#[derive(Debug, Clone)]
pub struct WalkingRoute {
    /// Ordered (lng, lat) coordinates
    pub geometry: LineString<f64>,
    pub distance_m: f64,
    pub duration_s: f64,
    pub instructions: Vec<String>,
}

/// Provider of walking routes between two (lng, lat) points.
///
/// A failure here surfaces as a trip-calculation error, never a panic.
pub trait WalkingDirections: Sync {
    fn walking_route(&self, from: Point<f64>, to: Point<f64>) -> Result<WalkingRoute, Error>;
}
