//! Read-only adjacency view the search kernel consumes (spec.md §4.6), plus
//! the one concrete graph collaborator the engine ships with: a directed,
//! explicitly-built weighted graph over small integer vertex ids.
//!
//! Graph construction and storage are out of scope for the engine proper
//! (spec.md §1); `AdjacencyGraph` exists only so the crate is usable
//! without a caller having to write their own `GraphView` impl first.

use rustc_hash::FxHashMap;
use std::fmt;

/// Opaque vertex handle for arbitrary graphs. Identity and hashing are by
/// the wrapped integer, per spec.md §3 ("Identity is an opaque handle").
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

impl fmt::Debug for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Minimal read interface the search kernel needs from a graph (spec.md
/// §4.6): successors, predecessors, edge cost, membership.
pub trait GraphView<V> {
    /// Outgoing `(neighbor, cost)` pairs. Only finite-cost, existing edges
    /// are yielded.
    fn successors(&self, v: V) -> Vec<(V, f64)>;

    /// Incoming `(neighbor, cost)` pairs, i.e. edges `neighbor -> v`.
    fn predecessors(&self, v: V) -> Vec<(V, f64)>;

    /// `cost(from, to)`, or `+∞` if the edge does not exist or is blocked.
    fn cost(&self, from: V, to: V) -> f64;

    /// Whether `v` has been registered with the graph.
    fn contains(&self, v: V) -> bool;
}

/// A directed, explicitly-built weighted graph. Multi-edges between the
/// same ordered pair are not permitted; re-adding an edge overwrites its
/// cost (spec.md §3).
#[derive(Debug, Default, Clone)]
pub struct AdjacencyGraph {
    nodes: rustc_hash::FxHashSet<VertexId>,
    out_edges: FxHashMap<VertexId, FxHashMap<VertexId, f64>>,
    in_edges: FxHashMap<VertexId, FxHashMap<VertexId, f64>>,
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: adding an already-known node is a no-op.
    pub fn add_node(&mut self, v: VertexId) {
        self.nodes.insert(v);
        self.out_edges.entry(v).or_default();
        self.in_edges.entry(v).or_default();
    }

    /// Idempotent: re-adding an edge overwrites its cost (spec.md §3). Both
    /// endpoints are implicitly registered as nodes.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, cost: f64) {
        self.add_node(from);
        self.add_node(to);
        self.out_edges.get_mut(&from).unwrap().insert(to, cost);
        self.in_edges.get_mut(&to).unwrap().insert(from, cost);
    }

    /// Returns the previous cost, if any.
    pub fn remove_edge(&mut self, from: VertexId, to: VertexId) -> Option<f64> {
        let removed = self.out_edges.get_mut(&from).and_then(|m| m.remove(&to));
        if removed.is_some() {
            if let Some(m) = self.in_edges.get_mut(&to) {
                m.remove(&from);
            }
        }
        removed
    }

    /// Whether `(from, to)` has ever been registered via `add_edge`,
    /// regardless of its current cost (which may itself be `+∞`).
    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.out_edges
            .get(&from)
            .map(|m| m.contains_key(&to))
            .unwrap_or(false)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.nodes.iter().copied()
    }
}

impl GraphView<VertexId> for AdjacencyGraph {
    fn successors(&self, v: VertexId) -> Vec<(VertexId, f64)> {
        self.out_edges
            .get(&v)
            .map(|m| m.iter().map(|(&n, &c)| (n, c)).collect())
            .unwrap_or_default()
    }

    fn predecessors(&self, v: VertexId) -> Vec<(VertexId, f64)> {
        self.in_edges
            .get(&v)
            .map(|m| m.iter().map(|(&n, &c)| (n, c)).collect())
            .unwrap_or_default()
    }

    fn cost(&self, from: VertexId, to: VertexId) -> f64 {
        self.out_edges
            .get(&from)
            .and_then(|m| m.get(&to))
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    fn contains(&self, v: VertexId) -> bool {
        self.nodes.contains(&v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_overwrites_cost() {
        let mut g = AdjacencyGraph::new();
        g.add_edge(VertexId(1), VertexId(2), 5.0);
        assert_eq!(g.cost(VertexId(1), VertexId(2)), 5.0);
        g.add_edge(VertexId(1), VertexId(2), 2.5);
        assert_eq!(g.cost(VertexId(1), VertexId(2)), 2.5);
        assert_eq!(g.successors(VertexId(1)).len(), 1);
    }

    #[test]
    fn unknown_edge_is_infinite() {
        let g = AdjacencyGraph::new();
        assert_eq!(g.cost(VertexId(1), VertexId(2)), f64::INFINITY);
    }

    #[test]
    fn predecessors_mirror_successors() {
        let mut g = AdjacencyGraph::new();
        g.add_edge(VertexId(1), VertexId(2), 1.0);
        g.add_edge(VertexId(3), VertexId(2), 4.0);
        let mut preds: Vec<_> = g.predecessors(VertexId(2));
        preds.sort_by_key(|(v, _)| v.0);
        assert_eq!(preds, vec![(VertexId(1), 1.0), (VertexId(3), 4.0)]);
    }
}
