use std::time::Instant;

use mpi::topology::Color;
use mpi::traits::*;
use tracing_subscriber::EnvFilter;

use ball_tree_mpi::config::{RunArgs, RunConfig};
use ball_tree_mpi::error::BallTreeError;
use ball_tree_mpi::generator;
use ball_tree_mpi::team::TeamContext;
use ball_tree_mpi::tree::{self, NodeRecord};
use ball_tree_mpi::dump;

fn run() -> Result<(), BallTreeError> {
    let args: RunArgs = argh::from_env();
    let config = RunConfig::from_args(args)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let universe = mpi::initialize()
        .ok_or_else(|| BallTreeError::Collective("mpi::initialize failed".into()))?;
    let world = universe.world();
    let comm = world
        .split_by_color(Color::with_value(0))
        .ok_or_else(|| BallTreeError::Collective("split_by_color failed".into()))?;
    let team = TeamContext::new(comm);

    let start = Instant::now();

    let local_points = generator::get_points(config.n_dims, config.n_points, config.seed, team.rank, team.size);

    let mut nodes: Vec<NodeRecord> = Vec::new();
    tree::build_tree(&team, local_points, 0, config.n_dims, &mut nodes)?;

    team.comm.barrier();
    let elapsed = start.elapsed().as_secs_f64();

    let local_node_count = nodes.len() as i64;
    let n_nodes_total: i64 = team.gather_counts(local_node_count).iter().sum();

    if team.rank == 0 {
        println!("{} {}", config.n_dims, n_nodes_total);
    }
    team.comm.barrier();

    dump::dump_tree_ordered(&team.comm, &nodes);
    team.comm.barrier();

    if team.rank == 0 {
        eprintln!("{:.1}", elapsed);
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
