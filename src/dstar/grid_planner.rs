//! Classic D* specialized to an 8-connected grid with dynamic obstacles
//! (spec.md §1, §4.6, §6). Composes [`crate::dstar::DStarClassic`] with an
//! owned [`crate::grid::GridGraph`] so `add_obstacle`/`remove_obstacle` can
//! be exposed directly, the way spec.md §6 lists them as first-class on
//! the planner for the grid variant.

use crate::dstar::DStarClassic;
use crate::error::PlannerResult;
use crate::grid::{GridGraph, Position};

pub struct GridDStar {
    env: GridGraph,
    engine: DStarClassic<Position>,
}

impl GridDStar {
    pub fn new(env: GridGraph, start: Position, goal: Position) -> PlannerResult<Self> {
        let mut engine = DStarClassic::new(goal);
        engine.initialize(start, goal, &env)?;
        Ok(GridDStar { env, engine })
    }

    pub fn compute_shortest_path(&mut self) {
        self.engine.process_state(&self.env);
    }

    pub fn set_start(&mut self, start: Position) -> PlannerResult<()> {
        self.engine.set_start(start, &self.env)
    }

    /// Adds a permanent wall and notifies the engine.
    pub fn set_wall(&mut self, p: Position) {
        self.env.set_wall(p);
        self.notify_changed(p);
    }

    /// Adds a dynamic obstacle (§6 `add_obstacle`). No-op if already
    /// blocked.
    pub fn add_obstacle(&mut self, p: Position) {
        if self.env.add_obstacle(p) {
            self.notify_changed(p);
        }
    }

    /// Removes a dynamic obstacle (§6 `remove_obstacle`). No-op if it
    /// wasn't blocked.
    pub fn remove_obstacle(&mut self, p: Position) {
        if self.env.remove_obstacle(p) {
            self.notify_changed(p);
        }
    }

    /// Re-opens `p` and every cell adjacent to it, since all of their edge
    /// costs to/from `p` just changed, then drains the open list.
    fn notify_changed(&mut self, p: Position) {
        self.engine.modify_cost(p, &self.env);
        for n in self.env.neighbor_coords(p) {
            self.engine.modify_cost(n, &self.env);
        }
    }

    pub fn get_path(&self) -> Option<Vec<Position>> {
        self.engine.get_path(&self.env)
    }

    pub fn get_path_cost(&self) -> f64 {
        self.engine.get_path_cost()
    }

    pub fn env(&self) -> &GridGraph {
        &self.env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S5, grid with dynamic obstacle (spec.md §8).
    #[test]
    fn s5_grid_with_dynamic_obstacle() {
        let env = GridGraph::new(20, 10);
        let start = Position::new(2, 2);
        let goal = Position::new(17, 7);
        let mut planner = GridDStar::new(env, start, goal).unwrap();
        planner.compute_shortest_path();
        let first_path = planner.get_path().expect("open grid must have a path");
        assert_eq!(first_path.first(), Some(&start));
        assert_eq!(first_path.last(), Some(&goal));
        assert!(is_eight_connected(&first_path));
        let first_cost = planner.get_path_cost();

        planner.add_obstacle(Position::new(5, 2));
        planner.add_obstacle(Position::new(6, 2));

        let second_path = planner.get_path().expect("path must still exist");
        assert_eq!(second_path.first(), Some(&start));
        assert_eq!(second_path.last(), Some(&goal));
        assert!(is_eight_connected(&second_path));
        assert!(!second_path.contains(&Position::new(5, 2)));
        assert!(!second_path.contains(&Position::new(6, 2)));
        let second_cost = planner.get_path_cost();
        assert!(second_cost >= first_cost - 1e-9);
    }

    fn is_eight_connected(path: &[Position]) -> bool {
        path.windows(2).all(|pair| {
            let (a, b) = (pair[0], pair[1]);
            (a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1 && a != b
        })
    }

    #[test]
    fn obstacle_blocking_only_route_loses_path() {
        let env = GridGraph::new(3, 1);
        let start = Position::new(0, 0);
        let goal = Position::new(2, 0);
        let mut planner = GridDStar::new(env, start, goal).unwrap();
        planner.compute_shortest_path();
        assert!(planner.get_path().is_some());

        planner.add_obstacle(Position::new(1, 0));
        assert_eq!(planner.get_path(), None);
        assert_eq!(planner.get_path_cost(), f64::INFINITY);
    }
}
