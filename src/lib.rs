//! Incremental shortest-path planners over dynamically changing weighted
//! graphs: D* Lite ([`dstar_lite`]) and classic D* ([`dstar`]).

pub mod dstar;
pub mod dstar_lite;
pub mod error;
pub mod graph;
pub mod grid;
pub mod heuristic;
pub mod pq;

pub use dstar::{DStarClassic, grid_planner::GridDStar};
pub use dstar_lite::DStarLite;
pub use error::{PlannerError, PlannerResult};
pub use graph::{AdjacencyGraph, GraphView, VertexId};
pub use grid::{GridGraph, Position};
pub use heuristic::{Heuristic, ZeroHeuristic};
