//! Calibration constants for graph construction and trip estimation
//!
//! The defaults are domain calibration values for Metro Manila informal
//! transit, not algorithmic choices; override them per deployment rather
//! than editing the defaults.

use crate::model::VehicleType;

/// Average in-traffic speeds per vehicle class, in km/h
#[derive(Debug, Clone, Copy)]
pub struct SpeedProfile {
    pub jeepney_kmh: f64,
    pub tricycle_kmh: f64,
    pub e_jeep_kmh: f64,
    pub bus_kmh: f64,
    pub walking_kmh: f64,
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self {
            jeepney_kmh: 18.0,
            tricycle_kmh: 15.0,
            e_jeep_kmh: 20.0,
            bus_kmh: 25.0,
            walking_kmh: 5.0,
        }
    }
}

impl SpeedProfile {
    pub fn speed_kmh(&self, vehicle: VehicleType) -> f64 {
        match vehicle {
            VehicleType::Jeepney => self.jeepney_kmh,
            VehicleType::Tricycle => self.tricycle_kmh,
            VehicleType::EJeep => self.e_jeep_kmh,
            VehicleType::Bus => self.bus_kmh,
        }
    }

    /// Minutes to cover `distance_km` with the given vehicle
    pub fn ride_minutes(&self, vehicle: VehicleType, distance_km: f64) -> f64 {
        distance_km / self.speed_kmh(vehicle) * 60.0
    }

    /// Minutes to walk `distance_km`
    pub fn walk_minutes(&self, distance_km: f64) -> f64 {
        distance_km / self.walking_kmh * 60.0
    }
}

/// Settings for graph construction
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub speeds: SpeedProfile,
    /// Maximum distance between two nodes for a walking transfer, in meters
    pub transfer_distance_m: f64,
    /// Fixed penalty added to every walking transfer, in minutes
    pub transfer_penalty_min: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            speeds: SpeedProfile::default(),
            transfer_distance_m: 100.0,
            transfer_penalty_min: 5.0,
        }
    }
}

/// Settings for intra-zone direct-trip estimation
#[derive(Debug, Clone, Copy)]
pub struct ZoneConfig {
    /// Multiplier on straight-line distance accounting for non-straight roads
    pub road_factor: f64,
    /// Average speed of intra-zone transport, in km/h
    pub local_speed_kmh: f64,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            road_factor: 1.3,
            local_speed_kmh: 15.0,
        }
    }
}

/// Settings for live navigation tracking
#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    /// Arrival is detected strictly closer than this to the final coordinate
    pub waypoint_threshold_m: f64,
    /// Fixes strictly farther than this from the itinerary are ignored
    pub off_route_threshold_m: f64,
    /// Minimum interval between accepted position updates
    pub min_update_interval_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            waypoint_threshold_m: 50.0,
            off_route_threshold_m: 200.0,
            min_update_interval_ms: 3000,
        }
    }
}
