//! 2D grid environment collaborator for the classic D* planner.
//!
//! Grid modeling is named as an out-of-scope external collaborator in
//! spec.md §1; this module is the minimal implementation the demo binary
//! and the classic-D* tests need, not a general-purpose map format.

use crate::graph::GraphView;
use rustc_hash::FxHashSet;
use std::fmt;

/// A cell coordinate. `x` grows right, `y` grows down, matching the
/// teacher's row/column convention in its own grid printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

/// A fixed-size grid with a set of permanent walls and a mutable set of
/// dynamic obstacles. `GraphView` implements the 8-connected neighborhood
/// spec.md §4.6 requires: axial moves cost 1, diagonal moves cost √2,
/// blocked or out-of-bounds targets cost `+∞`.
pub struct GridGraph {
    pub width: i32,
    pub height: i32,
    walls: FxHashSet<Position>,
    obstacles: FxHashSet<Position>,
}

impl GridGraph {
    pub fn new(width: i32, height: i32) -> Self {
        GridGraph {
            width,
            height,
            walls: FxHashSet::default(),
            obstacles: FxHashSet::default(),
        }
    }

    pub fn in_bounds(&self, p: Position) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    pub fn is_blocked(&self, p: Position) -> bool {
        self.walls.contains(&p) || self.obstacles.contains(&p)
    }

    pub fn set_wall(&mut self, p: Position) {
        self.walls.insert(p);
    }

    pub fn clear_wall(&mut self, p: Position) {
        self.walls.remove(&p);
    }

    /// Adds a dynamic obstacle. Returns `true` if this changed the
    /// blocked/unblocked state of `p`.
    pub fn add_obstacle(&mut self, p: Position) -> bool {
        !self.walls.contains(&p) && self.obstacles.insert(p)
    }

    /// Removes a dynamic obstacle. Returns `true` if this changed the
    /// blocked/unblocked state of `p`.
    pub fn remove_obstacle(&mut self, p: Position) -> bool {
        !self.walls.contains(&p) && self.obstacles.remove(&p)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = Position> + '_ {
        self.obstacles.iter().copied()
    }

    /// The 8 neighboring cells regardless of blocked status, for callers
    /// (e.g. [`crate::dstar::grid_planner`]) that need to know which
    /// vertices are affected when `p` itself is blocked or unblocked.
    pub fn neighbor_coords(&self, p: Position) -> Vec<Position> {
        const OFFSETS: [(i32, i32); 8] = [
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ];
        OFFSETS
            .iter()
            .map(|&(dx, dy)| Position::new(p.x + dx, p.y + dy))
            .filter(|&n| self.in_bounds(n))
            .collect()
    }

    /// The 8 neighboring cells, in-bounds and not blocked, along with their
    /// move cost. Diagonal moves are not permitted to cut between two
    /// orthogonally-blocked cells (no corner-cutting).
    fn open_neighbors(&self, p: Position) -> Vec<(Position, f64)> {
        const OFFSETS: [(i32, i32, f64); 8] = [
            (1, 0, 1.0),
            (-1, 0, 1.0),
            (0, 1, 1.0),
            (0, -1, 1.0),
            (1, 1, DIAGONAL_COST),
            (1, -1, DIAGONAL_COST),
            (-1, 1, DIAGONAL_COST),
            (-1, -1, DIAGONAL_COST),
        ];

        let mut out = Vec::with_capacity(8);
        for (dx, dy, cost) in OFFSETS {
            let n = Position::new(p.x + dx, p.y + dy);
            if !self.in_bounds(n) || self.is_blocked(n) {
                continue;
            }
            if dx != 0 && dy != 0 {
                let corner_a = Position::new(p.x + dx, p.y);
                let corner_b = Position::new(p.x, p.y + dy);
                if self.is_blocked(corner_a) || self.is_blocked(corner_b) {
                    continue;
                }
            }
            out.push((n, cost));
        }
        out
    }
}

impl GraphView<Position> for GridGraph {
    fn successors(&self, v: Position) -> Vec<(Position, f64)> {
        if !self.in_bounds(v) || self.is_blocked(v) {
            return Vec::new();
        }
        self.open_neighbors(v)
    }

    /// Symmetric 8-neighborhood: predecessors = successors (spec.md §4.6).
    fn predecessors(&self, v: Position) -> Vec<(Position, f64)> {
        self.successors(v)
    }

    fn cost(&self, from: Position, to: Position) -> f64 {
        self.open_neighbors(from)
            .into_iter()
            .find(|(n, _)| *n == to)
            .map(|(_, c)| c)
            .unwrap_or(f64::INFINITY)
    }

    fn contains(&self, v: Position) -> bool {
        self.in_bounds(v)
    }
}
