//! Caller-supplied heuristic functions.
//!
//! Per §4.2 of the spec the heuristic must be admissible and consistent
//! with respect to the graph's edge costs; the engine trusts this and does
//! not check it. Represented as a single-method trait (Design Notes §9:
//! "function pointer / small trait with a single method; no inheritance"),
//! with a blanket impl over `Fn(V, V) -> f64` closures so callers rarely
//! need to name a type.

/// A pure, non-negative distance estimate between two vertices.
pub trait Heuristic<V> {
    fn estimate(&self, from: V, to: V) -> f64;
}

impl<V, F> Heuristic<V> for F
where
    F: Fn(V, V) -> f64,
{
    fn estimate(&self, from: V, to: V) -> f64 {
        (self)(from, to)
    }
}

/// Trivial always-admissible heuristic (`h = 0`), degenerating the search
/// to plain Dijkstra. Used when a caller has no domain-specific metric to
/// supply; callers with real geometry should replace this, as spec.md
/// §4.2 notes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroHeuristic;

impl<V> Heuristic<V> for ZeroHeuristic {
    fn estimate(&self, _from: V, _to: V) -> f64 {
        0.0
    }
}
