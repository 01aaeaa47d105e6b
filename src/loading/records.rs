//! Raw records as returned by the external transit data store.
//!
//! These are loosely typed on purpose: the hosted store gives no schema
//! guarantees, so everything is validated here and converted to the strict
//! model types before it can reach the routing engine.

use geo::{Coord, LineString, Point, Polygon};
use serde::Deserialize;

use crate::error::Error;
use crate::model::{FareZone, GraphNode, NodeKind, VehicleType};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StopRecord {
    pub id: u64,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub is_terminal: bool,
    pub vehicle_types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RouteRecord {
    pub vehicle_type: String,
    pub base_fare: f64,
    pub fare_per_km: f64,
    /// Ordered stop ids from origin to terminus
    pub stops: Vec<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ZoneRecord {
    pub id: u64,
    pub name: String,
    pub base_fare: f64,
    pub per_km: f64,
    /// Closed ring of (lat, lng) pairs, store convention
    pub polygon: Vec<[f64; 2]>,
}

pub(crate) fn parse_vehicle_type(raw: &str) -> Result<VehicleType, Error> {
    match raw {
        "jeepney" => Ok(VehicleType::Jeepney),
        "tricycle" => Ok(VehicleType::Tricycle),
        "e-jeep" => Ok(VehicleType::EJeep),
        "bus" => Ok(VehicleType::Bus),
        other => Err(Error::InvalidData(format!(
            "unknown vehicle type: {other:?}"
        ))),
    }
}

fn validate_fares(base_fare: f64, per_km: f64) -> Result<(), Error> {
    if !base_fare.is_finite() || !per_km.is_finite() || base_fare < 0.0 || per_km < 0.0 {
        return Err(Error::InvalidData(format!(
            "negative or non-finite fare fields: base {base_fare}, per km {per_km}"
        )));
    }
    Ok(())
}

fn validate_coordinates(lat: f64, lng: f64) -> Result<(), Error> {
    if !lat.is_finite() || !lng.is_finite() || lat.abs() > 90.0 || lng.abs() > 180.0 {
        return Err(Error::InvalidData(format!(
            "coordinates out of range: ({lat}, {lng})"
        )));
    }
    Ok(())
}

impl RouteRecord {
    /// Check the record and return its parsed vehicle type. Edge weights are
    /// derived from the fare fields, so both must be finite and
    /// non-negative before any edge is built from this record.
    pub(crate) fn validate(&self) -> Result<VehicleType, Error> {
        let vehicle = parse_vehicle_type(&self.vehicle_type)?;
        validate_fares(self.base_fare, self.fare_per_km)?;
        Ok(vehicle)
    }
}

impl StopRecord {
    pub(crate) fn into_node(self) -> Result<GraphNode, Error> {
        validate_coordinates(self.lat, self.lng)?;

        let vehicle_types = self
            .vehicle_types
            .iter()
            .map(|raw| parse_vehicle_type(raw))
            .collect::<Result<Vec<_>, _>>()?;

        if vehicle_types.is_empty() {
            return Err(Error::InvalidData(format!(
                "stop {} serves no vehicle types",
                self.id
            )));
        }

        Ok(GraphNode {
            id: self.id,
            kind: if self.is_terminal {
                NodeKind::Terminal
            } else {
                NodeKind::Stop
            },
            location: Point::new(self.lng, self.lat),
            name: self.name,
            vehicle_types,
        })
    }
}

impl ZoneRecord {
    pub(crate) fn into_zone(self) -> Result<FareZone, Error> {
        validate_fares(self.base_fare, self.per_km)?;

        if self.polygon.len() < 3 {
            return Err(Error::InvalidData(format!(
                "zone {} ring has fewer than 3 points",
                self.id
            )));
        }

        let mut coords: Vec<Coord<f64>> = Vec::with_capacity(self.polygon.len() + 1);
        for [lat, lng] in &self.polygon {
            validate_coordinates(*lat, *lng)?;
            coords.push(Coord { x: *lng, y: *lat });
        }
        // geo closes the ring itself, but be explicit about it
        if coords.first() != coords.last() {
            coords.push(coords[0]);
        }

        Ok(FareZone {
            id: self.id,
            name: self.name,
            base_fare: self.base_fare,
            per_km: self.per_km,
            polygon: Polygon::new(LineString::new(coords), vec![]),
        })
    }
}
