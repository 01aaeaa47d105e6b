//! Single-source shortest path over one graph snapshot.
//!
//! Classic binary-heap Dijkstra. All three weight dimensions are
//! non-negative by construction, so the algorithm is valid for any
//! [`Criterion`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::HashMap;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::model::{GraphEdge, NodeId, TransitGraph};

/// Cost dimension a search minimizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Time,
    Distance,
    Fare,
}

impl Criterion {
    pub(crate) fn weight(self, edge: &GraphEdge) -> f64 {
        match self {
            Self::Time => edge.duration_min,
            Self::Distance => edge.distance_km,
            Self::Fare => edge.fare_php,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Distance => "distance",
            Self::Fare => "fare",
        }
    }
}

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: NodeIndex,
}

impl Eq for State {}

// Min-heap by cost (reversed from standard Rust BinaryHeap); ties broken by
// node index so pop order is deterministic.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.index().cmp(&self.node.index()))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A minimum-cost path between two nodes
#[derive(Debug, Clone)]
pub struct PathResult {
    /// Visited node ids, start to end inclusive
    pub nodes: Vec<NodeId>,
    /// The exact edges traversed, one per hop
    pub edges: Vec<EdgeIndex>,
    /// Accumulated cost in the chosen dimension
    pub total: f64,
}

/// Find the minimum-cost path from `start` to `end` for one criterion.
///
/// Returns `None` when either endpoint is absent or no connecting path
/// exists. Parallel edges are handled by min-relaxation; the first-inserted
/// edge wins on exact cost ties.
pub fn shortest_path(
    graph: &TransitGraph,
    start: NodeId,
    end: NodeId,
    criterion: Criterion,
) -> Option<PathResult> {
    let start_idx = graph.index_of(start)?;
    let end_idx = graph.index_of(end)?;

    let mut distances: HashMap<NodeIndex, f64> = HashMap::new();
    let mut predecessors: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    distances.insert(start_idx, 0.0);
    heap.push(State {
        cost: 0.0,
        node: start_idx,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if node == end_idx {
            break;
        }

        // Stale entry: a better path was already finalized
        if let Some(&best) = distances.get(&node) {
            if cost > best {
                continue;
            }
        }

        for edge in graph.graph.edges(node) {
            let next = edge.target();
            let next_cost = cost + criterion.weight(edge.weight());

            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    predecessors.insert(next, (node, edge.id()));
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        predecessors.insert(next, (node, edge.id()));
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    if start_idx != end_idx && !predecessors.contains_key(&end_idx) {
        return None;
    }

    // Walk predecessors back from the end and reverse
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut current = end_idx;
    nodes.push(graph.node_at(current).id);
    while current != start_idx {
        let &(prev, edge) = predecessors.get(&current)?;
        edges.push(edge);
        nodes.push(graph.node_at(prev).id);
        current = prev;
    }
    nodes.reverse();
    edges.reverse();

    Some(PathResult {
        nodes,
        edges,
        total: distances[&end_idx],
    })
}
