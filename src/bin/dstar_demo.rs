//! Thin CLI demo driving both planner variants over a randomly generated
//! grid, in the teacher's `main.rs`/`config.rs` style: a `clap`-derived
//! `Config`, plain `println!` human-readable output, and `env_logger` wired
//! to `RUST_LOG` for the `log::debug!`/`log::trace!` instrumentation the
//! engines emit internally.

use clap::Parser;
use dstar::dstar::grid_planner::GridDStar;
use dstar::dstar_lite::DStarLite;
use dstar::graph::VertexId;
use dstar::grid::{GridGraph, Position};
use dstar::graph::GraphView;
use dstar::heuristic::Heuristic;
use rand::Rng;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Config {
    #[arg(long, default_value_t = 20)]
    grid_size: i32,

    #[arg(long, default_value_t = 10)]
    num_obstacles: usize,

    #[arg(long, default_value = "d_star_lite")]
    algorithm: String,

    #[arg(long, default_value_t = false)]
    quiet: bool,
}

struct Octile;

impl Heuristic<Position> for Octile {
    fn estimate(&self, from: Position, to: Position) -> f64 {
        let dx = (from.x - to.x).abs() as f64;
        let dy = (from.y - to.y).abs() as f64;
        dx.max(dy) + (std::f64::consts::SQRT_2 - 1.0) * dx.min(dy)
    }
}

fn random_grid(size: i32, num_obstacles: usize, start: Position, goal: Position) -> GridGraph {
    let mut grid = GridGraph::new(size, size);
    let mut rng = rand::thread_rng();
    let mut placed = 0;
    while placed < num_obstacles {
        let p = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if p == start || p == goal {
            continue;
        }
        if grid.add_obstacle(p) {
            placed += 1;
        }
    }
    grid
}

fn run_d_star_lite(config: &Config, start: Position, goal: Position, grid: &GridGraph) {
    let mut planner = DStarLite::new(Octile);
    let start_id = VertexId(position_index(start, config.grid_size));
    let goal_id = VertexId(position_index(goal, config.grid_size));
    for y in 0..config.grid_size {
        for x in 0..config.grid_size {
            let p = Position::new(x, y);
            let from = VertexId(position_index(p, config.grid_size));
            planner.add_node(from);
            for (n, cost) in grid.successors(p) {
                planner.add_edge(from, VertexId(position_index(n, config.grid_size)), cost);
            }
        }
    }

    if planner.initialize(start_id, goal_id).is_err() {
        eprintln!("failed to initialize: start or goal out of bounds");
        std::process::exit(1);
    }
    planner.compute_shortest_path();

    match planner.get_path() {
        Some(path) => {
            if !config.quiet {
                println!("d_star_lite: path of {} steps, cost {:.3}", path.len(), planner.get_path_cost());
            }
        }
        None => println!("d_star_lite: no path found"),
    }
}

fn position_index(p: Position, size: i32) -> u32 {
    (p.y * size + p.x) as u32
}

fn run_classic_d_star(start: Position, goal: Position, grid: GridGraph) {
    let mut planner = match GridDStar::new(grid, start, goal) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("failed to initialize: {e}");
            std::process::exit(1);
        }
    };
    planner.compute_shortest_path();
    match planner.get_path() {
        Some(path) => println!("d_star: path of {} steps, cost {:.3}", path.len(), planner.get_path_cost()),
        None => println!("d_star: no path found"),
    }
}

fn main() {
    env_logger::init();
    let config = Config::parse();

    println!("Starting D* demo...");
    println!("Grid size: {}x{}", config.grid_size, config.grid_size);
    println!("Obstacles: {}", config.num_obstacles);
    println!("Algorithm: {}", config.algorithm);
    println!();

    let start = Position::new(0, 0);
    let goal = Position::new(config.grid_size - 1, config.grid_size - 1);
    let grid = random_grid(config.grid_size, config.num_obstacles, start, goal);

    match config.algorithm.as_str() {
        "d_star" => run_classic_d_star(start, goal, grid),
        "all" => {
            run_d_star_lite(&config, start, goal, &grid);
            run_classic_d_star(start, goal, grid);
        }
        _ => run_d_star_lite(&config, start, goal, &grid),
    }
}
