//! D* Lite: incremental shortest-path search with a moving start
//! (Koenig & Likhachev 2002), specialized to an arbitrary directed
//! weighted graph the engine owns directly (spec.md §6 lists
//! `add_node`/`add_edge` as part of the engine's own surface).
//!
//! Grounded on the teacher crate's `algorithms::d_star_lite::DStarLite`:
//! same `(k1, k2)` key, same lazy-deletion-avoiding re-key-on-pop loop
//! structure, same `km` accumulator and `update_edge_costs_incremental`
//! idea, generalized from `Position`-on-a-grid to an arbitrary
//! `VertexId` graph, and rebuilt on the indexed priority queue in
//! [`crate::pq`] rather than a generation-stamped `BinaryHeap`.

mod key;

pub use key::Key;

use crate::error::{unknown_vertex, PlannerError, PlannerResult};
use crate::graph::{AdjacencyGraph, GraphView, VertexId};
use crate::heuristic::Heuristic;
use crate::pq::IndexedPriorityQueue;
use rustc_hash::FxHashMap;

/// Absolute tolerance for local-consistency comparisons (spec.md §4.3).
const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    if a.is_infinite() || b.is_infinite() {
        a == b
    } else {
        (a - b).abs() <= EPSILON
    }
}

/// D* Lite planner over an arbitrary directed weighted graph.
pub struct DStarLite<H> {
    graph: AdjacencyGraph,
    heuristic: H,
    g: FxHashMap<VertexId, f64>,
    rhs: FxHashMap<VertexId, f64>,
    queue: IndexedPriorityQueue<VertexId, Key>,
    km: f64,
    start: VertexId,
    goal: VertexId,
    /// Edge cost recorded the first time `update_edge_cost` touches a pair,
    /// so `restore_edge_cost` can put it back (spec.md §6, §8 Idempotence).
    original_costs: FxHashMap<(VertexId, VertexId), f64>,
    initialized: bool,
}

impl<H: Heuristic<VertexId>> DStarLite<H> {
    /// `new(heuristic)` (spec.md §6). The heuristic must be admissible and
    /// consistent with respect to the graph's edge costs; the engine does
    /// not verify this.
    pub fn new(heuristic: H) -> Self {
        DStarLite {
            graph: AdjacencyGraph::new(),
            heuristic,
            g: FxHashMap::default(),
            rhs: FxHashMap::default(),
            queue: IndexedPriorityQueue::new(),
            km: 0.0,
            start: VertexId(0),
            goal: VertexId(0),
            original_costs: FxHashMap::default(),
            initialized: false,
        }
    }

    pub fn add_node(&mut self, v: VertexId) {
        self.graph.add_node(v);
    }

    /// Idempotent: re-adding an edge overwrites its cost.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, cost: f64) {
        self.graph.add_edge(from, to, cost);
    }

    fn g_of(&self, v: VertexId) -> f64 {
        *self.g.get(&v).unwrap_or(&f64::INFINITY)
    }

    fn rhs_of(&self, v: VertexId) -> f64 {
        *self.rhs.get(&v).unwrap_or(&f64::INFINITY)
    }

    fn h(&self, a: VertexId, b: VertexId) -> f64 {
        self.heuristic.estimate(a, b)
    }

    fn calculate_key(&self, v: VertexId) -> Key {
        let min_val = self.g_of(v).min(self.rhs_of(v));
        if min_val.is_infinite() {
            Key::INFINITE
        } else {
            Key {
                k1: min_val + self.h(v, self.start) + self.km,
                k2: min_val,
            }
        }
    }

    /// `initialize(start, goal)` (spec.md §4.5, §6). Resets all known
    /// vertices' `g`/`rhs`, zeroes `km`, and seeds the queue with the goal.
    pub fn initialize(&mut self, start: VertexId, goal: VertexId) -> PlannerResult<()> {
        if !self.graph.contains(start) {
            return Err(unknown_vertex(start));
        }
        if !self.graph.contains(goal) {
            return Err(unknown_vertex(goal));
        }

        self.g.clear();
        self.rhs.clear();
        self.queue = IndexedPriorityQueue::new();
        self.km = 0.0;
        self.start = start;
        self.goal = goal;

        self.rhs.insert(goal, 0.0);
        let key = self.calculate_key(goal);
        self.queue.enqueue(goal, key);
        self.initialized = true;
        log::debug!("initialize: start={:?} goal={:?}", start, goal);
        Ok(())
    }

    /// `UpdateVertex(u)` (spec.md §4.3).
    fn update_vertex(&mut self, u: VertexId) {
        if u != self.goal {
            let mut min_rhs = f64::INFINITY;
            for (s, cost) in self.graph.successors(u) {
                let g_s = self.g_of(s);
                if cost.is_finite() && g_s.is_finite() {
                    let total = cost + g_s;
                    if total < min_rhs {
                        min_rhs = total;
                    }
                }
            }
            self.rhs.insert(u, min_rhs);
        }

        if self.queue.contains(u) {
            self.queue.remove(u);
        }

        if !approx_eq(self.g_of(u), self.rhs_of(u)) {
            let key = self.calculate_key(u);
            self.queue.enqueue(u, key);
        }
    }

    /// `ComputeShortestPath()` (spec.md §4.3). Returns `true` iff
    /// `g(start)` is finite once the loop terminates.
    pub fn compute_shortest_path(&mut self) -> bool {
        loop {
            let start_key = self.calculate_key(self.start);
            let start_inconsistent = !approx_eq(self.g_of(self.start), self.rhs_of(self.start));

            let Some(k_old) = self.queue.peek_priority().copied() else {
                break;
            };
            if !(k_old < start_key) && !start_inconsistent {
                break;
            }

            let u = self.queue.peek().expect("peeked a priority with no vertex");
            let k_new = self.calculate_key(u);

            if k_old < k_new {
                self.queue.remove(u);
                self.queue.enqueue(u, k_new);
                log::trace!("re-keyed stale entry for {:?}", u);
                continue;
            }

            let g_u = self.g_of(u);
            let rhs_u = self.rhs_of(u);

            if g_u > rhs_u {
                self.g.insert(u, rhs_u);
                self.queue.remove(u);
                log::trace!("{:?} made consistent, g={}", u, rhs_u);
                for (p, _) in self.graph.predecessors(u) {
                    self.update_vertex(p);
                }
            } else {
                self.g.insert(u, f64::INFINITY);
                self.update_vertex(u);
                for (p, _) in self.graph.predecessors(u) {
                    self.update_vertex(p);
                }
            }
        }

        self.g_of(self.start).is_finite()
    }

    /// `update_start_and_replan(new_start)` (spec.md §4.5, §6).
    pub fn update_start_and_replan(&mut self, new_start: VertexId) -> PlannerResult<bool> {
        if !self.graph.contains(new_start) {
            return Err(unknown_vertex(new_start));
        }
        self.km += self.h(self.start, new_start);
        self.start = new_start;
        log::debug!("start moved to {:?}, km={}", new_start, self.km);
        Ok(self.compute_shortest_path())
    }

    /// `update_edge_cost(from, to, new_cost)` (spec.md §4.5, §7). A no-op
    /// if `(from, to)` is not a known edge (StaleEdge, §7).
    pub fn update_edge_cost(&mut self, from: VertexId, to: VertexId, new_cost: f64) {
        if !self.apply_cost_change(from, to, new_cost) {
            return;
        }
        self.update_vertex(from);
        self.compute_shortest_path();
    }

    /// `restore_edge_cost(from, to)`: restores the cost recorded the first
    /// time `update_edge_cost` touched this edge. No-op if the edge was
    /// never changed, or is unknown (StaleEdge, §7, and Idempotence, §8).
    pub fn restore_edge_cost(&mut self, from: VertexId, to: VertexId) {
        let Some(&original) = self.original_costs.get(&(from, to)) else {
            return;
        };
        self.original_costs.remove(&(from, to));
        self.graph.add_edge(from, to, original);
        self.update_vertex(from);
        self.compute_shortest_path();
    }

    /// Batch form of `update_edge_cost`: apply every change first, then
    /// run one repair pass (spec.md §4.5).
    pub fn update_edges_batch(&mut self, changes: &[(VertexId, VertexId, f64)]) {
        let mut touched: Vec<VertexId> = Vec::new();
        for &(from, to, new_cost) in changes {
            if self.apply_cost_change(from, to, new_cost) {
                touched.push(from);
            }
        }
        touched.sort_by_key(|v| v.0);
        touched.dedup();
        for from in touched {
            self.update_vertex(from);
        }
        self.compute_shortest_path();
    }

    /// Applies a single cost change without re-running the kernel. Returns
    /// `false` (no-op) if the edge is unknown.
    fn apply_cost_change(&mut self, from: VertexId, to: VertexId, new_cost: f64) -> bool {
        if !self.graph.has_edge(from, to) {
            return false;
        }
        let current = self.graph.cost(from, to);
        self.original_costs.entry((from, to)).or_insert(current);
        self.graph.add_edge(from, to, new_cost);
        true
    }

    /// `get_path()` (spec.md §6). Greedily follows
    /// `argmin_{s'} cost(current, s') + g(s')` from `start` to `goal`.
    /// Safeguards against pathological inconsistency by bailing out after
    /// `2 * |V|` steps (spec.md §4.5).
    pub fn get_path(&self) -> Option<Vec<VertexId>> {
        if !self.g_of(self.start).is_finite() {
            return None;
        }

        let limit = 2 * self.graph.node_count().max(1);
        let mut path = vec![self.start];
        let mut current = self.start;

        while current != self.goal {
            let next = self
                .graph
                .successors(current)
                .into_iter()
                .filter(|(_, cost)| cost.is_finite())
                .filter_map(|(s, cost)| {
                    let total = cost + self.g_of(s);
                    total.is_finite().then_some((s, total))
                })
                .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
                .map(|(s, _)| s)?;

            path.push(next);
            current = next;
            if path.len() > limit {
                return None;
            }
        }

        Some(path)
    }

    /// `get_path_cost()` (spec.md §6). `+∞` if `start` is unreachable.
    pub fn get_path_cost(&self) -> f64 {
        self.g_of(self.start)
    }

    /// `get_edge_states()` (spec.md §6): every known edge and its current
    /// cost.
    pub fn get_edge_states(&self) -> FxHashMap<(VertexId, VertexId), f64> {
        let mut out = FxHashMap::default();
        for v in self.graph.nodes() {
            for (n, cost) in self.graph.successors(v) {
                out.insert((v, n), cost);
            }
        }
        out
    }

    pub fn start(&self) -> VertexId {
        self.start
    }

    pub fn goal(&self) -> VertexId {
        self.goal
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
