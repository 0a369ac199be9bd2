//! A* route search over a [`WeightedGraph`].

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use tracing::debug;

use crate::error::RouteError;
use crate::graph::{Edge, NodeId, WeightedGraph};

/// Edge attribute accumulated along a path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Criterion {
    Cost,
    Distance,
    /// Accumulates the negated sum of capacities, so that wider pipelines
    /// are preferred. This only orders the search: the result is a path
    /// found early through high-capacity edges, not a minimum of any
    /// well-defined path cost. The geometric heuristic is never applied and
    /// each node is expanded at most once.
    Capacity,
}

impl Criterion {
    pub fn weight(&self, edge: &Edge) -> f64 {
        match self {
            Criterion::Cost => edge.cost,
            Criterion::Distance => edge.distance,
            Criterion::Capacity => -edge.capacity,
        }
    }

    fn uses_heuristic(&self) -> bool {
        !matches!(self, Criterion::Capacity)
    }
}

impl FromStr for Criterion {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cost" => Ok(Criterion::Cost),
            "distance" => Ok(Criterion::Distance),
            "capacity" => Ok(Criterion::Capacity),
            other => Err(RouteError::UnsupportedCriterion(other.to_owned())),
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Criterion::Cost => "cost",
            Criterion::Distance => "distance",
            Criterion::Capacity => "capacity",
        };
        f.write_str(name)
    }
}

/// A path from start to goal, both inclusive.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    ids: Vec<NodeId>,
    names: Vec<String>,
    accumulated: f64,
    criterion: Criterion,
}

impl Route {
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn nodes(&self) -> &[String] {
        &self.names
    }

    /// Accumulated criterion value at the goal.
    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    pub fn start(&self) -> &str {
        &self.names[0]
    }

    pub fn goal(&self) -> &str {
        &self.names[self.names.len() - 1]
    }

    /// Number of hops.
    pub fn hops(&self) -> usize {
        self.ids.len() - 1
    }

    /// Recompute the total of `criterion` along this path, taking the
    /// cheapest parallel edge for each hop. `None` if a hop has no edge.
    pub fn total(&self, graph: &WeightedGraph, criterion: Criterion) -> Option<f64> {
        self.ids.windows(2).try_fold(0., |acc, hop| {
            graph
                .neighbors(hop[0])
                .iter()
                .filter(|e| e.to == hop[1])
                .map(|e| criterion.weight(e))
                .min_by(f64::total_cmp)
                .map(|w| acc + w)
        })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({} {})", self.names.join(" -> "), self.criterion, self.accumulated)
    }
}

/// Open-set entry.
///
/// `BinaryHeap` is a max-heap and we pop the lowest priority, so `Ord` is
/// reversed. Equal priorities pop the lower `NodeId` first, then the older push.
struct Entry {
    priority: f64,
    accumulated: f64,
    node: NodeId,
    seq: u64,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority.total_cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

pub struct RouteOptimizer<'g> {
    graph: &'g WeightedGraph,
    weight_distance: f64,
}

impl<'g> RouteOptimizer<'g> {
    pub fn new(graph: &'g WeightedGraph) -> Self {
        Self {
            graph,
            weight_distance: 1.,
        }
    }

    /// Scale applied to the Euclidean distance estimate. `0` turns the
    /// search into plain Dijkstra.
    ///
    /// # Panics
    ///
    /// If `weight` is negative, NaN or infinite.
    pub fn with_heuristic_weight(mut self, weight: f64) -> Self {
        assert!(weight.is_finite() && weight >= 0., "heuristic weight must be finite and >= 0");
        self.weight_distance = weight;
        self
    }

    /// Estimate of the remaining value from `node` to `goal`.
    ///
    /// Admissible for `Cost`/`Distance` only when every edge's value is at
    /// least `weight_distance` times the straight-line distance it covers.
    pub fn heuristic(&self, node: NodeId, goal: NodeId, criterion: Criterion) -> f64 {
        if !criterion.uses_heuristic() {
            return 0.;
        }
        match (self.graph.coordinates(node), self.graph.coordinates(goal)) {
            (Some((x1, y1)), Some((x2, y2))) => self.weight_distance * (x2 - x1).hypot(y2 - y1),
            _ => 0.,
        }
    }

    /// Find a route between two named nodes.
    ///
    /// `Ok(None)` when the goal is unknown or unreachable from the start.
    pub fn find_route(
        &self,
        start: &str,
        goal: &str,
        criterion: Criterion,
    ) -> Result<Option<Route>, RouteError> {
        let from = self
            .graph
            .node_id(start)
            .ok_or_else(|| RouteError::UnknownNode(start.to_owned()))?;
        let route = match self.graph.node_id(goal) {
            Some(to) => self.search(from, to, criterion),
            None => None,
        };
        match &route {
            Some(route) => debug!(start, goal, %criterion, %route, "Route found"),
            None => debug!(start, goal, %criterion, "No route found"),
        }
        Ok(route)
    }

    /// As [`find_route`](Self::find_route), with the criterion given by name.
    pub fn find_route_by_name(
        &self,
        start: &str,
        goal: &str,
        criterion: &str,
    ) -> Result<Option<Route>, RouteError> {
        self.find_route(start, goal, criterion.parse()?)
    }

    pub fn search(&self, start: NodeId, goal: NodeId, criterion: Criterion) -> Option<Route> {
        let n = self.graph.node_count();
        if start.0 >= n || goal.0 >= n {
            return None;
        }

        let mut best: Vec<Option<f64>> = vec![None; n];
        let mut came_from: Vec<Option<NodeId>> = vec![None; n];
        // Only used for Capacity, where negative accumulation would
        // otherwise relax around cycles forever.
        let mut closed = BitSet::with_capacity(n);
        let single_expansion = criterion == Criterion::Capacity;

        let mut open = BinaryHeap::new();
        let mut seq = 0;
        best[start.0] = Some(0.);
        open.push(Entry {
            priority: self.heuristic(start, goal, criterion),
            accumulated: 0.,
            node: start,
            seq,
        });

        let mut expanded = 0usize;
        while let Some(Entry { accumulated, node, .. }) = open.pop() {
            if best[node.0].is_some_and(|b| b < accumulated) {
                continue;
            }
            if node == goal {
                debug!(expanded, "Goal reached");
                return Some(self.reconstruct(&came_from, goal, accumulated, criterion));
            }
            if single_expansion && !closed.insert(node.0) {
                continue;
            }
            expanded += 1;

            for edge in self.graph.neighbors(node) {
                let next = edge.to;
                if single_expansion && closed.contains(next.0) {
                    continue;
                }
                let tentative = accumulated + criterion.weight(edge);
                if best[next.0].is_none_or(|b| tentative < b) {
                    best[next.0] = Some(tentative);
                    came_from[next.0] = Some(node);
                    seq += 1;
                    open.push(Entry {
                        priority: tentative + self.heuristic(next, goal, criterion),
                        accumulated: tentative,
                        node: next,
                        seq,
                    });
                }
            }
        }
        debug!(expanded, "Open set exhausted");
        None
    }

    fn reconstruct(
        &self,
        came_from: &[Option<NodeId>],
        goal: NodeId,
        accumulated: f64,
        criterion: Criterion,
    ) -> Route {
        let mut ids = vec![goal];
        let mut current = goal;
        while let Some(prev) = came_from[current.0] {
            ids.push(prev);
            current = prev;
        }
        ids.reverse();
        let names = ids
            .iter()
            .map(|&id| self.graph.name(id).unwrap_or_default().to_owned())
            .collect();
        Route {
            ids,
            names,
            accumulated,
            criterion,
        }
    }
}
