//! Builds a routable graph snapshot from persisted stop, route and zone
//! records.
//!
//! Construction is a pure function of the source records and the network
//! config: no caching, no incremental mutation. Every trip calculation gets
//! its own fresh snapshot.

use itertools::Itertools;
use log::{info, warn};
use petgraph::graph::{DiGraph, NodeIndex};
use rayon::prelude::*;

use super::config::NetworkConfig;
use super::source::TransitDataSource;
use crate::geometry::haversine_km;
use crate::model::{GraphEdge, GraphNode, TransitGraph, TravelMode};

/// Create a graph snapshot from the data source.
///
/// A failing or empty source yields an empty graph, which callers must treat
/// as "no route possible" rather than an error.
pub fn build_graph<S: TransitDataSource>(source: &S, config: &NetworkConfig) -> TransitGraph {
    let stops = source.stops().unwrap_or_else(|e| {
        warn!("Transit data source failed to provide stops: {e}");
        Vec::new()
    });
    let routes = source.routes().unwrap_or_else(|e| {
        warn!("Transit data source failed to provide routes: {e}");
        Vec::new()
    });
    let zones = source.zones().unwrap_or_else(|e| {
        warn!("Transit data source failed to provide zones: {e}");
        Vec::new()
    });

    let mut graph: DiGraph<GraphNode, GraphEdge> = DiGraph::new();
    let mut index_by_id = hashbrown::HashMap::new();

    for record in stops {
        let id = record.id;
        match record.into_node() {
            Ok(node) => {
                if index_by_id.contains_key(&id) {
                    warn!("Duplicate stop id {id} - keeping the first record");
                    continue;
                }
                let idx = graph.add_node(node);
                index_by_id.insert(id, idx);
            }
            Err(e) => warn!("Skipping invalid stop record {id}: {e}"),
        }
    }

    for record in routes {
        let vehicle = match record.validate() {
            Ok(v) => v,
            Err(e) => {
                warn!("Skipping invalid route record: {e}");
                continue;
            }
        };

        for (&from_id, &to_id) in record.stops.iter().tuple_windows() {
            let (Some(&from), Some(&to)) = (index_by_id.get(&from_id), index_by_id.get(&to_id))
            else {
                warn!("Route references unknown stop ({from_id} -> {to_id}) - skipping edge");
                continue;
            };

            let distance_km = haversine_km(graph[from].location, graph[to].location);
            graph.add_edge(
                from,
                to,
                GraphEdge {
                    mode: TravelMode::Ride(vehicle),
                    distance_km,
                    duration_min: config.speeds.ride_minutes(vehicle, distance_km),
                    fare_php: record.base_fare + distance_km * record.fare_per_km,
                },
            );
        }
    }

    add_walking_transfers(&mut graph, config);

    let zones = zones
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            record
                .into_zone()
                .map_err(|e| warn!("Skipping invalid zone record {id}: {e}"))
                .ok()
        })
        .collect();

    info!(
        "Built transit graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    TransitGraph::new(graph, zones)
}

/// Add walking-transfer edges between all node pairs closer than the
/// proximity threshold.
///
/// The pair scan runs in parallel; results are sorted before insertion so
/// edge order (and therefore Dijkstra tie-breaking) stays deterministic.
fn add_walking_transfers(graph: &mut DiGraph<GraphNode, GraphEdge>, config: &NetworkConfig) {
    let threshold_km = config.transfer_distance_m / 1000.0;

    let snapshot: &DiGraph<GraphNode, GraphEdge> = graph;
    let indices: Vec<NodeIndex> = snapshot.node_indices().collect();

    let mut transfers: Vec<(NodeIndex, NodeIndex, f64)> = indices
        .par_iter()
        .flat_map_iter(|&from| {
            let from_loc = snapshot[from].location;
            let indices = &indices;
            indices.iter().filter_map(move |&to| {
                if from == to {
                    return None;
                }
                let distance_km = haversine_km(from_loc, snapshot[to].location);
                (distance_km < threshold_km).then_some((from, to, distance_km))
            })
        })
        .collect();

    transfers.sort_by_key(|(from, to, _)| (from.index(), to.index()));

    let count = transfers.len();
    for (from, to, distance_km) in transfers {
        graph.add_edge(
            from,
            to,
            GraphEdge {
                mode: TravelMode::Walk,
                distance_km,
                duration_min: config.speeds.walk_minutes(distance_km)
                    + config.transfer_penalty_min,
                fare_php: 0.0,
            },
        );
    }

    info!("Added {count} walking-transfer edges");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::loading::records::{RouteRecord, StopRecord, ZoneRecord};
    use crate::loading::source::StaticSource;
    use crate::model::NodeKind;
    use approx::assert_relative_eq;

    struct FailingSource;

    impl TransitDataSource for FailingSource {
        fn stops(&self) -> Result<Vec<StopRecord>, Error> {
            Err(Error::DataUnavailable("store offline".into()))
        }
        fn routes(&self) -> Result<Vec<RouteRecord>, Error> {
            Err(Error::DataUnavailable("store offline".into()))
        }
        fn zones(&self) -> Result<Vec<ZoneRecord>, Error> {
            Err(Error::DataUnavailable("store offline".into()))
        }
    }

    fn stop(id: u64, name: &str, lat: f64, lng: f64, terminal: bool) -> StopRecord {
        StopRecord {
            id,
            name: name.into(),
            lat,
            lng,
            is_terminal: terminal,
            vehicle_types: vec!["jeepney".into()],
        }
    }

    fn outgoing(graph: &TransitGraph, from: NodeIndex) -> Vec<GraphEdge> {
        use petgraph::visit::EdgeRef;
        graph
            .graph
            .edges(from)
            .map(|e| e.weight().clone())
            .collect()
    }

    fn pilot_source() -> StaticSource {
        StaticSource::new(
            vec![
                stop(1, "Tandang Sora Terminal", 14.676, 121.0437, true),
                stop(101, "Sanville Subdivision", 14.6715, 121.0452, false),
                stop(102, "Centralville / 7-Eleven", 14.6685, 121.0468, false),
                // 68 m from the terminal, inside the transfer threshold
                stop(201, "Palengke (Wet Market)", 14.6755, 121.0433, false),
            ],
            vec![RouteRecord {
                vehicle_type: "jeepney".into(),
                base_fare: 13.0,
                fare_per_km: 1.8,
                stops: vec![1, 101, 102],
            }],
            vec![],
        )
    }

    #[test]
    fn every_stop_becomes_one_node() {
        let graph = build_graph(&pilot_source(), &NetworkConfig::default());
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.node(1).unwrap().kind, NodeKind::Terminal);
        assert_eq!(graph.node(101).unwrap().kind, NodeKind::Stop);
    }

    #[test]
    fn route_edges_carry_all_three_weights() {
        let config = NetworkConfig::default();
        let graph = build_graph(&pilot_source(), &config);

        let from = graph.index_of(1).unwrap();
        let edge = outgoing(&graph, from)
            .into_iter()
            .find(|e| !e.mode.is_walk())
            .unwrap();

        let expected_km = haversine_km(
            graph.node(1).unwrap().location,
            graph.node(101).unwrap().location,
        );
        assert_relative_eq!(edge.distance_km, expected_km);
        assert_relative_eq!(edge.duration_min, expected_km / 18.0 * 60.0);
        assert_relative_eq!(edge.fare_php, 13.0 + expected_km * 1.8);
    }

    #[test]
    fn nearby_nodes_get_a_transfer_edge_pair() {
        let graph = build_graph(&pilot_source(), &NetworkConfig::default());
        // Terminal 1 and stop 201 are ~68 m apart: expect walk edges both ways.
        // Route edges: 2. Transfers: 2.
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn distant_nodes_get_no_transfer_edge() {
        let mut wide = NetworkConfig::default();
        wide.transfer_distance_m = 10.0;
        let graph = build_graph(&pilot_source(), &wide);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn transfer_edge_weights_include_penalty() {
        let config = NetworkConfig::default();
        let graph = build_graph(&pilot_source(), &config);
        let from = graph.index_of(1).unwrap();
        let edge = outgoing(&graph, from)
            .into_iter()
            .find(|e| e.mode.is_walk())
            .unwrap();
        assert_relative_eq!(edge.fare_php, 0.0);
        assert_relative_eq!(
            edge.duration_min,
            edge.distance_km / 5.0 * 60.0 + 5.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn failing_source_degrades_to_empty_graph() {
        let graph = build_graph(&FailingSource, &NetworkConfig::default());
        assert!(graph.is_empty());
        assert!(graph.zones.is_empty());
    }

    #[test]
    fn invalid_records_are_skipped_not_fatal() {
        let source = StaticSource::new(
            vec![
                stop(1, "ok", 14.676, 121.0437, true),
                StopRecord {
                    id: 2,
                    lat: f64::NAN,
                    lng: 121.0,
                    vehicle_types: vec!["bus".into()],
                    ..Default::default()
                },
            ],
            vec![RouteRecord {
                vehicle_type: "carriage".into(),
                stops: vec![1, 2],
                ..Default::default()
            }],
            vec![ZoneRecord {
                id: 9,
                polygon: vec![[14.0, 121.0]],
                ..Default::default()
            }],
        );
        let graph = build_graph(&source, &NetworkConfig::default());
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.zones.is_empty());
    }

    #[test]
    fn negative_fare_route_builds_no_edges() {
        let source = StaticSource::new(
            vec![
                stop(1, "Tandang Sora Terminal", 14.676, 121.0437, true),
                stop(101, "Sanville Subdivision", 14.6715, 121.0452, false),
                stop(102, "Centralville / 7-Eleven", 14.6685, 121.0468, false),
            ],
            vec![RouteRecord {
                vehicle_type: "jeepney".into(),
                base_fare: -50.0,
                fare_per_km: -10.0,
                stops: vec![1, 101, 102],
            }],
            vec![ZoneRecord {
                id: 4,
                name: "Sangandaan TODA".into(),
                base_fare: -12.0,
                per_km: 5.0,
                polygon: vec![[14.67, 121.04], [14.67, 121.06], [14.69, 121.05]],
            }],
        );
        let graph = build_graph(&source, &NetworkConfig::default());
        // Nodes survive, but the corrupt route contributes no ride edges and
        // the corrupt zone is dropped, so fare weights stay non-negative.
        assert_eq!(graph.node_count(), 3);
        assert!(
            (0..graph.node_count())
                .flat_map(|i| outgoing(&graph, NodeIndex::new(i)))
                .all(|e| e.mode.is_walk() && e.fare_php >= 0.0)
        );
        assert!(graph.zones.is_empty());
    }

    #[test]
    fn construction_is_deterministic() {
        let a = build_graph(&pilot_source(), &NetworkConfig::default());
        let b = build_graph(&pilot_source(), &NetworkConfig::default());
        assert_eq!(a.node_count(), b.node_count());
        assert_eq!(a.edge_count(), b.edge_count());
    }
}
