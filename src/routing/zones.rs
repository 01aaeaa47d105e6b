//! Flat-fare zone resolution and intra-zone direct-trip estimation.
//!
//! Zones model franchise areas (tricycle TODAs) that charge a flat
//! base-plus-per-km fare regardless of the road path taken. When both trip
//! endpoints fall inside the same zone, the planner skips graph search
//! entirely and quotes a direct point-to-point estimate.

use geo::{Contains, LineString, Point, coord};

use super::itinerary::{CalculatedRoute, RouteSegment, RouteTag, SegmentEndpoint};
use crate::geometry::haversine_km;
use crate::loading::config::ZoneConfig;
use crate::model::{FareZone, TravelMode, VehicleType};

/// The zone containing both endpoints, if any.
///
/// Membership is strictly interior: a point exactly on the polygon boundary
/// belongs to no zone.
pub fn same_zone<'a>(
    origin: Point<f64>,
    destination: Point<f64>,
    zones: &'a [FareZone],
) -> Option<&'a FareZone> {
    zones
        .iter()
        .find(|zone| zone.polygon.contains(&origin) && zone.polygon.contains(&destination))
}

/// Direct intra-zone itinerary.
///
/// This is a heuristic estimate, not a street-network route: distance is the
/// great-circle distance scaled by the road factor, and the geometry is an
/// indicative straight line unsuitable for turn-by-turn guidance. Tagged
/// Fastest, the conventional choice for point-to-point zone transport.
pub fn direct_trip(
    origin: SegmentEndpoint,
    destination: SegmentEndpoint,
    zone: &FareZone,
    config: &ZoneConfig,
) -> CalculatedRoute {
    let origin_point = Point::new(origin.lng, origin.lat);
    let destination_point = Point::new(destination.lng, destination.lat);

    let distance_km = haversine_km(origin_point, destination_point) * config.road_factor;
    let duration_min = distance_km / config.local_speed_kmh * 60.0;
    let fare_php = (zone.base_fare + distance_km * zone.per_km).ceil();

    let geometry = LineString::new(vec![
        coord! { x: origin.lng, y: origin.lat },
        coord! { x: destination.lng, y: destination.lat },
    ]);

    let segment = RouteSegment {
        mode: TravelMode::Ride(VehicleType::Tricycle),
        instructions: vec![format!(
            "Take a tricycle within {} to {}",
            zone.name, destination.name
        )],
        start: origin,
        end: destination,
        distance_km,
        duration_min,
        fare_php: Some(fare_php),
        geometry,
    };

    CalculatedRoute::from_segments(RouteTag::Fastest, vec![segment])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{Polygon, line_string};

    fn toda_zone() -> FareZone {
        // Rough square around Tandang Sora, ~3 km per side
        FareZone {
            id: 1,
            name: "Tandang Sora TODA".into(),
            base_fare: 12.0,
            per_km: 5.0,
            polygon: Polygon::new(
                line_string![
                    (x: 121.03, y: 14.66),
                    (x: 121.06, y: 14.66),
                    (x: 121.06, y: 14.69),
                    (x: 121.03, y: 14.69),
                    (x: 121.03, y: 14.66),
                ],
                vec![],
            ),
        }
    }

    fn other_zone() -> FareZone {
        FareZone {
            id: 2,
            name: "Philcoa TODA".into(),
            base_fare: 15.0,
            per_km: 6.0,
            polygon: Polygon::new(
                line_string![
                    (x: 121.07, y: 14.64),
                    (x: 121.09, y: 14.64),
                    (x: 121.09, y: 14.66),
                    (x: 121.07, y: 14.66),
                    (x: 121.07, y: 14.64),
                ],
                vec![],
            ),
        }
    }

    #[test]
    fn both_endpoints_inside_resolve_to_the_zone() {
        let zones = vec![other_zone(), toda_zone()];
        let zone = same_zone(
            Point::new(121.04, 14.67),
            Point::new(121.05, 14.68),
            &zones,
        )
        .unwrap();
        assert_eq!(zone.id, 1);
    }

    #[test]
    fn one_endpoint_outside_resolves_to_none() {
        let zones = vec![toda_zone()];
        assert!(same_zone(
            Point::new(121.04, 14.67),
            Point::new(121.10, 14.68),
            &zones,
        )
        .is_none());
    }

    #[test]
    fn endpoints_in_different_zones_resolve_to_none() {
        let zones = vec![toda_zone(), other_zone()];
        assert!(same_zone(
            Point::new(121.04, 14.67),
            Point::new(121.08, 14.65),
            &zones,
        )
        .is_none());
    }

    #[test]
    fn boundary_point_counts_as_outside() {
        let zones = vec![toda_zone()];
        assert!(same_zone(
            Point::new(121.03, 14.67),
            Point::new(121.05, 14.68),
            &zones,
        )
        .is_none());
    }

    #[test]
    fn direct_trip_applies_road_factor_and_ceils_fare() {
        let zone = toda_zone();
        let config = ZoneConfig::default();
        let origin = SegmentEndpoint::new(14.67, 121.04, "Origin");
        // ~2 km east along the same latitude
        let destination = SegmentEndpoint::new(14.67, 121.0586, "Destination");

        let straight_km = haversine_km(Point::new(121.04, 14.67), Point::new(121.0586, 14.67));
        assert!((straight_km - 2.0).abs() < 0.05, "got {straight_km}");

        let route = direct_trip(origin, destination, &zone, &config);
        assert_eq!(route.segments.len(), 1);
        assert_eq!(route.tag, RouteTag::Fastest);
        assert_eq!(route.transfer_count, 0);

        let road_km = straight_km * 1.3;
        assert_relative_eq!(route.total_distance_km, road_km, epsilon = 1e-9);
        assert_relative_eq!(route.total_duration_min, road_km / 15.0 * 60.0, epsilon = 1e-9);
        assert_relative_eq!(
            route.total_fare_php,
            (zone.base_fare + road_km * zone.per_km).ceil()
        );
        assert_eq!(route.total_fare_php.fract(), 0.0);
        assert!(route.segments[0].instructions[0].contains("Tandang Sora TODA"));
    }
}
