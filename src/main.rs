use goal_search::config::{Cli, Config};
use goal_search::problem::graph::{self, GraphState};
use goal_search::problem::roomba::{self, RoombaRouteState, SpotlessRoombaState};
use goal_search::problem::slidepuzzle::{self, SlidePuzzleState};
use goal_search::problem::{lookup_heuristic, Catalog, Domain};
use goal_search::report::RunReport;
use goal_search::{SearchAgent, State};

use anyhow::Context;
use clap::Parser;
use std::time::{Duration, Instant};
use tracing::{info, trace, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        Config::from_file(config_file)?
    } else {
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("invalid log level {:?}", config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if cli.config.is_none() {
        info!("No config file specified, using default config");
    }

    let problem = &config.problem;
    match config.domain {
        Domain::Graph => solve(&config, GraphState::from_file(problem)?, graph::HEURISTICS),
        Domain::Roomba => solve(
            &config,
            RoombaRouteState::from_file(problem)?,
            roomba::ROUTE_HEURISTICS,
        ),
        Domain::SpotlessRoomba => solve(
            &config,
            SpotlessRoombaState::from_file(problem)?,
            roomba::SPOTLESS_HEURISTICS,
        ),
        Domain::Slidepuzzle => solve(
            &config,
            SlidePuzzleState::from_file(problem)?,
            slidepuzzle::HEURISTICS,
        ),
    }
}

fn solve<S: State + 'static>(
    config: &Config,
    initial: S,
    catalog: Catalog<S>,
) -> anyhow::Result<()> {
    let heuristic = config
        .heuristic
        .as_deref()
        .map(|name| lookup_heuristic(catalog, name))
        .transpose()?;
    let mut agent =
        SearchAgent::new(config.algorithm, config.strategy, heuristic)?.with_seed(config.seed);
    info!(
        "Solving {} with {} search, {} strategy",
        config.problem, config.algorithm, config.strategy
    );
    info!("Initial state:\n{initial}");

    let start_time = Instant::now();
    let time_limit = config.time_limit_ms.map(Duration::from_millis);
    let mut extends = 0;
    let result = agent.run(
        initial,
        |node| {
            extends += 1;
            trace!(
                "extended depth {} cost {} ({extends} so far)",
                node.depth(),
                node.path_cost()
            );
            let out_of_extends = config.max_extends.is_some_and(|max| extends >= max);
            let out_of_time = time_limit.is_some_and(|limit| start_time.elapsed() >= limit);
            if out_of_extends || out_of_time {
                warn!("Search limit reached after {extends} extensions");
            }
            out_of_extends || out_of_time
        },
        config.cutoff(),
    )?;

    match &result {
        Some(node) => {
            for (step, visited) in node.path().iter().enumerate() {
                match visited.describe_last_action() {
                    Some(action) => info!("Step {step}: {action}\n{}", visited.state()),
                    None => info!("Step {step}: start\n{}", visited.state()),
                }
            }
            if node.is_goal() {
                info!("Goal reached with cost {}", node.path_cost());
            } else {
                warn!("No goal reached, best state has cost {}", node.path_cost());
            }
        }
        None => warn!("No solution found"),
    }

    if let Some(output_path) = &config.output_path {
        RunReport::new(config, result.as_ref(), agent.stats()).write_to(output_path)?;
        info!("Report written to {output_path}");
    }

    Ok(())
}
