//! Routable graph snapshot with a spatial index over its nodes

use geo::Point;
use hashbrown::HashMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use rstar::{RTree, primitives::GeomWithData};

use super::types::{FareZone, GraphEdge, GraphNode, NodeId, NodeKind};
use crate::geometry::haversine_km;

/// R-tree entry: node position in (lng, lat) degree space
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// One immutable snapshot of the routable network.
///
/// Built fresh for every trip calculation; never cached or mutated
/// incrementally, so concurrent requests are naturally isolated.
#[derive(Debug, Clone)]
pub struct TransitGraph {
    pub(crate) graph: DiGraph<GraphNode, GraphEdge>,
    node_index: HashMap<NodeId, NodeIndex>,
    rtree: RTree<IndexedPoint>,
    pub zones: Vec<FareZone>,
}

impl TransitGraph {
    pub fn new(graph: DiGraph<GraphNode, GraphEdge>, zones: Vec<FareZone>) -> Self {
        let node_index = graph
            .node_indices()
            .map(|idx| (graph[idx].id, idx))
            .collect();

        let points = graph
            .node_indices()
            .map(|idx| {
                let loc = graph[idx].location;
                IndexedPoint::new([loc.x(), loc.y()], idx)
            })
            .collect();
        let rtree = RTree::bulk_load(points);

        Self {
            graph,
            node_index,
            rtree,
            zones,
        }
    }

    pub fn empty() -> Self {
        Self::new(DiGraph::new(), Vec::new())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub(crate) fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.node_index.get(&id).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &GraphNode {
        &self.graph[idx]
    }

    pub(crate) fn edge_at(&self, idx: EdgeIndex) -> &GraphEdge {
        &self.graph[idx]
    }

    pub(crate) fn edge_endpoints(&self, idx: EdgeIndex) -> Option<(&GraphNode, &GraphNode)> {
        self.graph
            .edge_endpoints(idx)
            .map(|(a, b)| (&self.graph[a], &self.graph[b]))
    }

    /// Node nearest to `point`, optionally restricted to one kind.
    ///
    /// The R-tree search runs in planar degree space; the returned distance
    /// is haversine kilometers.
    pub fn nearest_node(
        &self,
        point: Point<f64>,
        kind: Option<NodeKind>,
    ) -> Option<(NodeId, f64)> {
        self.rtree
            .nearest_neighbor_iter(&[point.x(), point.y()])
            .map(|entry| &self.graph[entry.data])
            .find(|node| kind.is_none_or(|k| node.kind == k))
            .map(|node| (node.id, haversine_km(point, node.location)))
    }
}
