use std::fmt::Debug;

/// Failures a caller can recover from. Invariant violations are not modeled
/// here. They panic, since they indicate a bug in the engine itself rather
/// than a caller mistake (see module docs on `EmptyQueueOperation`).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// `initialize` or `update_start_and_replan` was given a vertex that
    /// was never registered with `add_node`/`add_edge`.
    #[error("vertex {0} was never added to the graph")]
    UnknownVertex(String),
}

pub type PlannerResult<T> = Result<T, PlannerError>;

pub(crate) fn unknown_vertex<V: Debug>(v: V) -> PlannerError {
    PlannerError::UnknownVertex(format!("{:?}", v))
}
