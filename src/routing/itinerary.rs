//! Itinerary types: tagged routes assembled from walking legs and graph
//! edges.

use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::json;

use super::dijkstra::PathResult;
use crate::model::{GraphNode, TransitGraph, TravelMode, VehicleType};

/// Which optimization criterion produced a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTag {
    Fastest,
    Cheapest,
    Shortest,
}

impl RouteTag {
    pub fn label(self) -> &'static str {
        match self {
            Self::Fastest => "FASTEST",
            Self::Cheapest => "CHEAPEST",
            Self::Shortest => "SHORTEST",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Fastest => "fastest",
            Self::Cheapest => "cheapest",
            Self::Shortest => "shortest",
        }
    }
}

/// Named endpoint of one segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentEndpoint {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

impl SegmentEndpoint {
    pub fn new(lat: f64, lng: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            name: name.into(),
        }
    }

    pub(crate) fn from_node(node: &GraphNode) -> Self {
        Self::new(node.lat(), node.lng(), node.name.clone())
    }
}

/// One contiguous leg of an itinerary: a walk, or a ride on one vehicle
#[derive(Debug, Clone)]
pub struct RouteSegment {
    pub mode: TravelMode,
    pub start: SegmentEndpoint,
    pub end: SegmentEndpoint,
    pub distance_km: f64,
    pub duration_min: f64,
    /// Present iff this is a ride segment
    pub fare_php: Option<f64>,
    /// Ordered (lng, lat) coordinates
    pub geometry: LineString<f64>,
    pub instructions: Vec<String>,
}

/// Complete door-to-door itinerary, tagged by the criterion that produced it
#[derive(Debug, Clone)]
pub struct CalculatedRoute {
    pub id: String,
    pub tag: RouteTag,
    pub segments: Vec<RouteSegment>,
    pub total_distance_km: f64,
    pub total_duration_min: f64,
    pub total_fare_php: f64,
    /// Vehicle types ridden, in boarding order, de-duplicated
    pub vehicle_types: Vec<VehicleType>,
    pub transfer_count: usize,
}

impl CalculatedRoute {
    /// Build a route from its segments, deriving totals and summary fields.
    ///
    /// A transfer is counted each time the traveler boards a new vehicle
    /// after the first: consecutive ride segments on the same vehicle type
    /// form one leg, and anything that interrupts a leg (a walk, or a
    /// different vehicle) starts a new one.
    pub fn from_segments(tag: RouteTag, segments: Vec<RouteSegment>) -> Self {
        let total_distance_km = segments.iter().map(|s| s.distance_km).sum();
        let total_duration_min = segments.iter().map(|s| s.duration_min).sum();
        let total_fare_php = segments.iter().filter_map(|s| s.fare_php).sum();

        let mut vehicle_types = Vec::new();
        let mut ride_legs = 0usize;
        let mut current_leg: Option<VehicleType> = None;
        for segment in &segments {
            match segment.mode {
                TravelMode::Walk => current_leg = None,
                TravelMode::Ride(vehicle) => {
                    if !vehicle_types.contains(&vehicle) {
                        vehicle_types.push(vehicle);
                    }
                    if current_leg != Some(vehicle) {
                        ride_legs += 1;
                        current_leg = Some(vehicle);
                    }
                }
            }
        }

        Self {
            id: format!("route-{}", tag.slug()),
            tag,
            segments,
            total_distance_km,
            total_duration_min,
            total_fare_php,
            vehicle_types,
            transfer_count: ride_legs.saturating_sub(1),
        }
    }

    /// Key for removing itineraries that are identical under more than one
    /// criterion. Bit-exact comparison is intentional: the same underlying
    /// path yields byte-identical totals.
    pub(crate) fn dedup_key(&self) -> (u64, u64) {
        (
            self.total_duration_min.to_bits(),
            self.total_fare_php.to_bits(),
        )
    }

    /// All segment coordinates concatenated into one ordered polyline
    pub fn full_geometry(&self) -> LineString<f64> {
        let coords: Vec<Coord<f64>> = self
            .segments
            .iter()
            .flat_map(|s| s.geometry.coords().copied())
            .collect();
        LineString::new(coords)
    }

    /// Export the itinerary as a `GeoJSON` `FeatureCollection`, one
    /// LineString feature per segment.
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .segments
            .iter()
            .enumerate()
            .map(|(idx, segment)| {
                let properties = json!({
                    "segment_index": idx,
                    "mode": segment.mode.label(),
                    "from_name": segment.start.name,
                    "to_name": segment.end.name,
                    "distance_km": segment.distance_km,
                    "duration_min": segment.duration_min,
                    "fare_php": segment.fare_php,
                });
                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new((&segment.geometry).into())),
                    id: None,
                    properties: properties.as_object().cloned(),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        }
    }
}

/// Expand a search result into ride/walk segments, one per edge traversed.
///
/// Edge geometry is the straight line between the incident nodes; walking
/// transfers become zero-fare walk segments.
pub(crate) fn segments_from_path(graph: &TransitGraph, path: &PathResult) -> Vec<RouteSegment> {
    path.edges
        .iter()
        .filter_map(|&edge_idx| {
            let (from, to) = graph.edge_endpoints(edge_idx)?;
            let edge = graph.edge_at(edge_idx);

            let geometry = LineString::new(vec![
                Coord {
                    x: from.lng(),
                    y: from.lat(),
                },
                Coord {
                    x: to.lng(),
                    y: to.lat(),
                },
            ]);

            let instructions = match edge.mode {
                TravelMode::Walk => {
                    vec![format!("Walk to {} to transfer", to.name)]
                }
                TravelMode::Ride(vehicle) => {
                    vec![format!("Ride the {} to {}", vehicle.label(), to.name)]
                }
            };

            Some(RouteSegment {
                mode: edge.mode,
                start: SegmentEndpoint::from_node(from),
                end: SegmentEndpoint::from_node(to),
                distance_km: edge.distance_km,
                duration_min: edge.duration_min,
                fare_php: (!edge.mode.is_walk()).then_some(edge.fare_php),
                geometry,
                instructions,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::line_string;

    fn walk(from: (f64, f64), to: (f64, f64), km: f64, min: f64) -> RouteSegment {
        RouteSegment {
            mode: TravelMode::Walk,
            start: SegmentEndpoint::new(from.1, from.0, "a"),
            end: SegmentEndpoint::new(to.1, to.0, "b"),
            distance_km: km,
            duration_min: min,
            fare_php: None,
            geometry: line_string![(x: from.0, y: from.1), (x: to.0, y: to.1)],
            instructions: vec![],
        }
    }

    fn ride(
        vehicle: VehicleType,
        from: (f64, f64),
        to: (f64, f64),
        km: f64,
        min: f64,
        fare: f64,
    ) -> RouteSegment {
        RouteSegment {
            mode: TravelMode::Ride(vehicle),
            fare_php: Some(fare),
            ..walk(from, to, km, min)
        }
    }

    #[test]
    fn totals_are_sums_over_segments() {
        let route = CalculatedRoute::from_segments(
            RouteTag::Fastest,
            vec![
                walk((121.04, 14.67), (121.05, 14.67), 0.4, 5.0),
                ride(
                    VehicleType::Jeepney,
                    (121.05, 14.67),
                    (121.06, 14.68),
                    3.0,
                    10.0,
                    13.0,
                ),
                walk((121.06, 14.68), (121.07, 14.68), 0.2, 2.5),
            ],
        );
        assert_relative_eq!(route.total_distance_km, 3.6);
        assert_relative_eq!(route.total_duration_min, 17.5);
        assert_relative_eq!(route.total_fare_php, 13.0);
        assert_eq!(route.vehicle_types, vec![VehicleType::Jeepney]);
        assert_eq!(route.transfer_count, 0);
        assert_eq!(route.id, "route-fastest");
    }

    #[test]
    fn transfer_counting_splits_ride_legs() {
        let j = VehicleType::Jeepney;
        let t = VehicleType::Tricycle;
        let p = (121.0, 14.6);
        let route = CalculatedRoute::from_segments(
            RouteTag::Cheapest,
            vec![
                // jeepney leg of two edges, walk transfer, tricycle leg
                ride(j, p, p, 1.0, 3.0, 13.0),
                ride(j, p, p, 1.0, 3.0, 13.0),
                walk(p, p, 0.1, 6.0),
                ride(t, p, p, 2.0, 8.0, 25.0),
            ],
        );
        assert_eq!(route.transfer_count, 1);
        assert_eq!(route.vehicle_types, vec![j, t]);

        // adjacent rides on different vehicles also count as a transfer
        let route = CalculatedRoute::from_segments(
            RouteTag::Cheapest,
            vec![ride(j, p, p, 1.0, 3.0, 13.0), ride(t, p, p, 2.0, 8.0, 25.0)],
        );
        assert_eq!(route.transfer_count, 1);
    }

    #[test]
    fn identical_totals_share_a_dedup_key() {
        let p = (121.0, 14.6);
        let a = CalculatedRoute::from_segments(
            RouteTag::Fastest,
            vec![ride(VehicleType::Bus, p, p, 5.0, 12.0, 15.0)],
        );
        let b = CalculatedRoute::from_segments(
            RouteTag::Shortest,
            vec![ride(VehicleType::Bus, p, p, 5.0, 12.0, 15.0)],
        );
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn full_geometry_concatenates_segments_in_order() {
        let route = CalculatedRoute::from_segments(
            RouteTag::Fastest,
            vec![
                walk((121.04, 14.67), (121.05, 14.67), 0.4, 5.0),
                walk((121.05, 14.67), (121.06, 14.68), 0.4, 5.0),
            ],
        );
        let line = route.full_geometry();
        assert_eq!(line.0.len(), 4);
        assert_eq!(line.0[0], Coord { x: 121.04, y: 14.67 });
        assert_eq!(line.0[3], Coord { x: 121.06, y: 14.68 });
    }

    #[test]
    fn geojson_export_has_one_feature_per_segment() {
        let route = CalculatedRoute::from_segments(
            RouteTag::Fastest,
            vec![
                walk((121.04, 14.67), (121.05, 14.67), 0.4, 5.0),
                ride(
                    VehicleType::EJeep,
                    (121.05, 14.67),
                    (121.06, 14.68),
                    3.0,
                    9.0,
                    15.0,
                ),
            ],
        );
        let collection = route.to_geojson();
        assert_eq!(collection.features.len(), 2);
        assert!(collection.features[1].geometry.is_some());
        let props = collection.features[1].properties.as_ref().unwrap();
        assert_eq!(props["mode"], "e-jeep");
        assert_eq!(props["fare_php"], 15.0);
    }
}
