//! Capacity-weighted distribution network.

use std::collections::HashMap;
use std::collections::VecDeque;

use bit_set::BitSet;
use tracing::{debug, trace};

use crate::error::GraphError;

/// Index of a node, assigned in registration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// Whether `add_edge` inserts one direction or both.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EdgePolicy {
    /// `origin -> destination` only.
    #[default]
    Directed,
    /// `origin -> destination` and `destination -> origin` with the same attributes.
    Mirrored,
}

/// An outgoing edge (pipeline or lane) from the node that owns it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub to: NodeId,
    pub cost: f64,
    pub distance: f64,
    /// Throughput limit, always strictly positive.
    pub capacity: f64,
}

struct Node {
    name: String,
    coordinates: Option<(f64, f64)>,
    edges: Vec<Edge>,
}

pub struct WeightedGraph {
    policy: EdgePolicy,
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

impl WeightedGraph {
    /// A directed graph.
    pub fn new() -> Self {
        Self::with_policy(EdgePolicy::Directed)
    }

    pub fn directed() -> Self {
        Self::with_policy(EdgePolicy::Directed)
    }

    /// Every edge added is mirrored into both directions.
    pub fn undirected() -> Self {
        Self::with_policy(EdgePolicy::Mirrored)
    }

    pub fn with_policy(policy: EdgePolicy) -> Self {
        Self {
            policy,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn policy(&self) -> EdgePolicy {
        self.policy
    }

    /// Register a node, optionally placed at `(x, y)`.
    ///
    /// Re-adding an existing name resets it: every edge touching the node,
    /// in either direction, is removed and its coordinates are replaced.
    /// The node keeps its `NodeId`.
    pub fn add_node(&mut self, name: &str, coordinates: Option<(f64, f64)>) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            debug!(node = name, "Resetting node");
            let node = &mut self.nodes[id.0];
            node.coordinates = coordinates;
            node.edges.clear();
            for other in self.nodes.iter_mut() {
                other.edges.retain(|e| e.to != id);
            }
            return id;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_owned(),
            coordinates,
            edges: Vec::new(),
        });
        self.index.insert(name.to_owned(), id);
        trace!(node = name, ?coordinates, "Node added");
        id
    }

    /// Add an edge between two registered nodes.
    pub fn add_edge(
        &mut self,
        origin: &str,
        destination: &str,
        cost: f64,
        distance: f64,
        capacity: f64,
    ) -> Result<(), GraphError> {
        let from = self.require(origin)?;
        let to = self.require(destination)?;

        // NaN fails these comparisons too.
        if !(cost >= 0.) {
            return Err(GraphError::InvalidAttribute { attribute: "cost", value: cost });
        }
        if !(distance >= 0.) {
            return Err(GraphError::InvalidAttribute { attribute: "distance", value: distance });
        }
        if !(capacity > 0.) {
            return Err(GraphError::InvalidAttribute { attribute: "capacity", value: capacity });
        }

        self.nodes[from.0].edges.push(Edge { to, cost, distance, capacity });
        if self.policy == EdgePolicy::Mirrored && from != to {
            self.nodes[to.0].edges.push(Edge { to: from, cost, distance, capacity });
        }
        trace!(origin, destination, cost, distance, capacity, "Edge added");
        Ok(())
    }

    fn require(&self, name: &str) -> Result<NodeId, GraphError> {
        self.node_id(name)
            .ok_or_else(|| GraphError::UnknownNode(name.to_owned()))
    }

    /// Outgoing edges of `node`. Empty for a node without edges or an id
    /// that does not belong to this graph.
    pub fn neighbors(&self, node: NodeId) -> &[Edge] {
        self.nodes
            .get(node.0)
            .map(|n| n.edges.as_slice())
            .unwrap_or(&[])
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|n| n.name.as_str())
    }

    pub fn coordinates(&self, node: NodeId) -> Option<(f64, f64)> {
        self.nodes.get(node.0).and_then(|n| n.coordinates)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored directed edges (a mirrored edge counts twice).
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Set of nodes reachable from `start`, `start` included.
    pub fn reachable_from(&self, start: NodeId) -> BitSet {
        let mut seen = BitSet::with_capacity(self.nodes.len());
        if start.0 >= self.nodes.len() {
            return seen;
        }
        let mut frontier = VecDeque::from([start]);
        seen.insert(start.0);
        while let Some(node) = frontier.pop_front() {
            for edge in self.neighbors(node) {
                if seen.insert(edge.to.0) {
                    frontier.push_back(edge.to);
                }
            }
        }
        seen
    }
}

impl Default for WeightedGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depot() -> WeightedGraph {
        let mut g = WeightedGraph::new();
        g.add_node("A", Some((0., 0.)));
        g.add_node("B", None);
        g.add_node("C", None);
        g
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let mut g = depot();
        assert_eq!(
            g.add_edge("A", "Z", 1., 1., 1.),
            Err(GraphError::UnknownNode("Z".into()))
        );
        assert_eq!(
            g.add_edge("Z", "A", 1., 1., 1.),
            Err(GraphError::UnknownNode("Z".into()))
        );
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn invalid_attributes_are_rejected() {
        let mut g = depot();
        assert!(matches!(
            g.add_edge("A", "B", -1., 1., 1.),
            Err(GraphError::InvalidAttribute { attribute: "cost", .. })
        ));
        assert!(matches!(
            g.add_edge("A", "B", 1., -0.5, 1.),
            Err(GraphError::InvalidAttribute { attribute: "distance", .. })
        ));
        assert!(matches!(
            g.add_edge("A", "B", 1., 1., 0.),
            Err(GraphError::InvalidAttribute { attribute: "capacity", .. })
        ));
        assert!(matches!(
            g.add_edge("A", "B", f64::NAN, 1., 1.),
            Err(GraphError::InvalidAttribute { attribute: "cost", .. })
        ));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn zero_cost_and_distance_are_allowed() {
        let mut g = depot();
        assert!(g.add_edge("A", "B", 0., 0., 10.).is_ok());
    }

    #[test]
    fn directed_keeps_one_direction() {
        let mut g = depot();
        g.add_edge("A", "B", 5., 1., 80.).unwrap();
        let a = g.node_id("A").unwrap();
        let b = g.node_id("B").unwrap();
        assert_eq!(g.neighbors(a).len(), 1);
        assert_eq!(g.neighbors(a)[0].to, b);
        assert!(g.neighbors(b).is_empty());
    }

    #[test]
    fn undirected_mirrors_edges() {
        let mut g = WeightedGraph::undirected();
        g.add_node("A", None);
        g.add_node("B", None);
        g.add_edge("A", "B", 5., 2., 80.).unwrap();
        let a = g.node_id("A").unwrap();
        let b = g.node_id("B").unwrap();
        assert_eq!(g.neighbors(b), &[Edge { to: a, cost: 5., distance: 2., capacity: 80. }]);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn neighbors_of_isolated_node_is_empty() {
        let g = depot();
        assert!(g.neighbors(g.node_id("C").unwrap()).is_empty());
        assert!(g.neighbors(NodeId(99)).is_empty());
    }

    #[test]
    fn re_adding_a_node_resets_its_edges() {
        let mut g = depot();
        g.add_edge("A", "B", 1., 1., 1.).unwrap();
        g.add_edge("B", "C", 1., 1., 1.).unwrap();
        g.add_edge("C", "B", 1., 1., 1.).unwrap();
        let b = g.add_node("B", Some((3., 4.)));

        assert_eq!(b, NodeId(1));
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.coordinates(b), Some((3., 4.)));
    }

    #[test]
    fn reachability() {
        let mut g = depot();
        g.add_edge("A", "B", 1., 1., 1.).unwrap();
        let reach = g.reachable_from(NodeId(0));
        assert!(reach.contains(0));
        assert!(reach.contains(1));
        assert!(!reach.contains(2));
        assert!(g.reachable_from(NodeId(7)).is_empty());
    }
}
