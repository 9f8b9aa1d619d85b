use crate::control::CancelToken;
use crate::error::SearchError;
use crate::stat::Stats;
use crate::state::{SearchNode, State};
use crate::strategy::{Heuristic, Strategy};
use crate::traversal::Algorithm;

use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, instrument};

/// A traversal algorithm paired with a frontier strategy.
///
/// Every run builds its own frontier, extended-state filter and counters, so
/// one agent can be run any number of times without carrying state between
/// runs. The statistics of the latest run stay readable through
/// [`SearchAgent::stats`].
pub struct SearchAgent<S: State> {
    algorithm: Algorithm,
    strategy: Strategy,
    heuristic: Option<Heuristic<S>>,
    seed: u64,
    stats: Stats,
}

impl<S: State + 'static> SearchAgent<S> {
    /// Fails with [`SearchError::MissingHeuristic`] when the strategy or the
    /// algorithm needs a heuristic and none is given.
    pub fn new(
        algorithm: Algorithm,
        strategy: Strategy,
        heuristic: Option<Heuristic<S>>,
    ) -> Result<Self, SearchError> {
        strategy.build(heuristic.as_ref(), 0)?;
        algorithm.build(heuristic.as_ref())?;
        Ok(SearchAgent {
            algorithm,
            strategy,
            heuristic,
            seed: 0,
            stats: Stats::default(),
        })
    }

    /// Seed for the random strategy. Each run reseeds from it.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Search from `initial` until a goal is dequeued, the frontier runs dry,
    /// or `progress` returns `true` after a node is processed.
    ///
    /// `cutoff` bounds depth for random, depth-first and breadth-first
    /// strategies and path cost for the best-first ones. Pass
    /// `f64::INFINITY` for an unbounded run.
    #[instrument(skip_all, name = "search_agent", fields(algorithm = %self.algorithm, strategy = %self.strategy), level = "debug")]
    pub fn run(
        &mut self,
        initial: S,
        mut progress: impl FnMut(&Rc<SearchNode<S>>) -> bool,
        cutoff: f64,
    ) -> Result<Option<Rc<SearchNode<S>>>, SearchError> {
        self.stats = Stats::default();
        let mut frontier = self.strategy.build(self.heuristic.as_ref(), self.seed)?;
        let mut traversal = self.algorithm.build(self.heuristic.as_ref())?;
        debug!("cutoff {cutoff}, seed {}", self.seed);

        let start_time = Instant::now();
        let result = traversal.search(
            frontier.as_mut(),
            SearchNode::root(initial),
            cutoff,
            &mut progress,
            &mut self.stats,
        );
        self.stats.time_us = start_time.elapsed().as_micros() as usize;
        self.stats.result_depth = result.as_ref().map(|node| node.depth());
        self.stats.result_cost = result.as_ref().map(|node| node.path_cost());
        self.stats.print();

        match &result {
            Some(node) if node.is_goal() => debug!("reached goal {node:?}"),
            Some(node) => debug!("no goal, best effort {node:?}"),
            None => debug!("no result"),
        }
        Ok(result)
    }

    /// Like [`SearchAgent::run`], but also stops once `token` is cancelled and
    /// blocks while it is paused. The token is polled right after `progress`.
    pub fn run_with_token(
        &mut self,
        initial: S,
        token: &CancelToken,
        mut progress: impl FnMut(&Rc<SearchNode<S>>) -> bool,
        cutoff: f64,
    ) -> Result<Option<Rc<SearchNode<S>>>, SearchError> {
        self.run(
            initial,
            |node: &Rc<SearchNode<S>>| progress(node) || token.should_stop(),
            cutoff,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::graph::GraphState;
    use crate::problem::lookup_heuristic;
    use crate::problem::roomba::{self, RoombaRouteState, SpotlessRoombaState};
    use crate::problem::slidepuzzle::SlidePuzzleState;

    use std::collections::HashSet;
    use tracing_subscriber;

    const ALGORITHMS: [Algorithm; 3] = [Algorithm::Tree, Algorithm::Graph, Algorithm::Anytime];
    const STRATEGIES: [Strategy; 6] = [
        Strategy::Random,
        Strategy::Dfs,
        Strategy::Bfs,
        Strategy::Ucs,
        Strategy::Greedy,
        Strategy::Astar,
    ];

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init();
    }

    fn weighted() -> GraphState {
        GraphState::from_file("problem_file/graph/weighted.txt").unwrap()
    }

    fn table() -> Option<Heuristic<GraphState>> {
        Some(Rc::new(|s: &GraphState| s.table_heuristic()))
    }

    fn names(node: &Rc<SearchNode<GraphState>>) -> Vec<String> {
        node.path()
            .iter()
            .map(|n| n.state().name().to_string())
            .collect()
    }

    #[test]
    fn test_uniform_cost_finds_cheapest_path() {
        init_tracing();
        for algorithm in [Algorithm::Tree, Algorithm::Graph] {
            let mut agent = SearchAgent::new(algorithm, Strategy::Ucs, None).unwrap();
            let result = agent.run(weighted(), |_| false, f64::INFINITY).unwrap().unwrap();
            assert_eq!(names(&result), vec!["A", "B", "C", "D"]);
            assert_eq!(result.path_cost(), 3.0);
            assert_eq!(agent.stats().result_cost, Some(3.0));
            assert_eq!(agent.stats().result_depth, Some(3));
        }
    }

    #[test]
    fn test_greedy_follows_lowest_heuristic() {
        init_tracing();
        let mut log = Vec::new();
        let mut agent = SearchAgent::new(Algorithm::Graph, Strategy::Greedy, table()).unwrap();
        let result = agent
            .run(
                weighted(),
                |node| {
                    log.push(node.state().name().to_string());
                    false
                },
                f64::INFINITY,
            )
            .unwrap()
            .unwrap();

        // h(C) = 1 beats h(B) = 3, so C is extended first and greedy settles
        // for the direct A -> C -> D route.
        assert_eq!(log, vec!["A", "C", "B"]);
        assert_eq!(names(&result), vec!["A", "C", "D"]);
        assert_eq!(result.path_cost(), 5.0);
    }

    #[test]
    fn test_romania_a_star_is_optimal() {
        init_tracing();
        let root = GraphState::from_file("problem_file/graph/romania.txt").unwrap();
        let mut agent = SearchAgent::new(Algorithm::Graph, Strategy::Astar, table()).unwrap();
        let result = agent.run(root.clone(), |_| false, f64::INFINITY).unwrap().unwrap();
        assert_eq!(result.path_cost(), 418.0);
        assert_eq!(
            names(&result),
            vec!["Arad", "Sibiu", "Rimnicu Vilcea", "Pitesti", "Bucharest"]
        );

        let mut ucs = SearchAgent::new(Algorithm::Graph, Strategy::Ucs, None).unwrap();
        let optimum = ucs.run(root.clone(), |_| false, f64::INFINITY).unwrap().unwrap();
        assert_eq!(optimum.path_cost(), 418.0);
        // A* with a consistent heuristic extends no more than uniform cost.
        assert!(agent.stats().extends <= ucs.stats().extends);

        let mut greedy = SearchAgent::new(Algorithm::Graph, Strategy::Greedy, table()).unwrap();
        let fast = greedy.run(root, |_| false, f64::INFINITY).unwrap().unwrap();
        assert_eq!(names(&fast), vec!["Arad", "Sibiu", "Fagaras", "Bucharest"]);
        assert_eq!(fast.path_cost(), 450.0);
    }

    #[test]
    fn test_bfs_matches_ucs_on_unit_costs() {
        init_tracing();
        let puzzle = SlidePuzzleState::from_file("problem_file/slidepuzzle/medium.txt").unwrap();

        let mut bfs = SearchAgent::new(Algorithm::Graph, Strategy::Bfs, None).unwrap();
        let shallow = bfs.run(puzzle.clone(), |_| false, f64::INFINITY).unwrap().unwrap();
        let mut ucs = SearchAgent::new(Algorithm::Graph, Strategy::Ucs, None).unwrap();
        let cheap = ucs.run(puzzle, |_| false, f64::INFINITY).unwrap().unwrap();

        assert!(shallow.is_goal());
        assert_eq!(shallow.depth(), 3);
        assert_eq!(shallow.depth() as f64, cheap.path_cost());
    }

    #[test]
    fn test_graph_search_never_extends_twice() {
        init_tracing();
        let room: RoombaRouteState = "3 3\n0 0\n. . .\n. . .\n. . ?\n".parse().unwrap();

        let mut extended = Vec::new();
        let mut graph = SearchAgent::new(Algorithm::Graph, Strategy::Bfs, None).unwrap();
        let found = graph
            .run(
                room.clone(),
                |node| {
                    extended.push(node.feature());
                    false
                },
                f64::INFINITY,
            )
            .unwrap()
            .unwrap();
        let distinct: HashSet<_> = extended.iter().collect();
        assert_eq!(distinct.len(), extended.len());
        assert_eq!(found.depth(), 4);

        // Two routes reach the centre at depth 2; tree search extends both.
        extended.clear();
        let mut tree = SearchAgent::new(Algorithm::Tree, Strategy::Bfs, None).unwrap();
        tree.run(
            room,
            |node| {
                extended.push(node.feature());
                false
            },
            f64::INFINITY,
        )
        .unwrap();
        let distinct: HashSet<_> = extended.iter().collect();
        assert!(distinct.len() < extended.len());
        assert!(extended.iter().filter(|cell| **cell == (1, 1)).count() >= 2);
    }

    #[test]
    fn test_anytime_returns_best_extended_state() {
        init_tracing();
        let room = RoombaRouteState::from_file("problem_file/roomba/route.txt").unwrap();
        let heuristic = lookup_heuristic(roomba::ROUTE_HEURISTICS, "manhattan").unwrap();

        let mut seen = Vec::new();
        let mut agent =
            SearchAgent::new(Algorithm::Anytime, Strategy::Bfs, Some(Rc::clone(&heuristic)))
                .unwrap();
        // A depth cutoff of 3 keeps the dirty cell out of reach.
        let best = agent
            .run(
                room,
                |node| {
                    seen.push(heuristic(node.state()));
                    false
                },
                3.0,
            )
            .unwrap()
            .unwrap();

        assert!(!best.is_goal());
        assert!(!seen.is_empty());
        let best_h = heuristic(best.state());
        assert!(seen.iter().all(|h| best_h <= *h));
    }

    #[test]
    fn test_never_returns_to_parent() {
        init_tracing();
        let room: RoombaRouteState = "3 3\n1 1\n. . .\n. . .\n. . .\n".parse().unwrap();
        let mut agent = SearchAgent::new(Algorithm::Tree, Strategy::Dfs, None).unwrap();
        let mut checked = 0;
        let result = agent
            .run(
                room,
                |node| {
                    if let Some(grandparent) = node.parent().and_then(|p| p.parent()) {
                        assert_ne!(grandparent.feature(), node.feature());
                        checked += 1;
                    }
                    false
                },
                5.0,
            )
            .unwrap();

        assert!(result.is_none());
        assert!(checked > 0);
    }

    #[test]
    fn test_one_step_path_round_trip() {
        let root: GraphState = "2\nA ? 0 : B,1\nB ? 0 : goal\nA\n".parse().unwrap();
        let step = root.action_to("B").unwrap();
        let mut agent = SearchAgent::new(Algorithm::Tree, Strategy::Bfs, None).unwrap();
        let child = agent.run(root, |_| false, f64::INFINITY).unwrap().unwrap();

        let path = child.path();
        assert_eq!(path.len(), 2);
        assert!(path[0].parent().is_none());
        assert!(Rc::ptr_eq(&path[1], &child));
        assert_eq!(child.last_action(), Some(&step));
        assert_eq!(child.actions(), vec![step]);
    }

    #[test]
    fn test_puzzle_one_move_by_bfs() {
        init_tracing();
        let puzzle: SlidePuzzleState = "3\n1 0 2\n3 4 5\n6 7 8\n".parse().unwrap();
        let mut agent = SearchAgent::new(Algorithm::Tree, Strategy::Bfs, None).unwrap();
        let result = agent.run(puzzle, |_| false, f64::INFINITY).unwrap().unwrap();

        assert!(result.is_goal());
        assert_eq!(result.depth(), 1);
        // The root plus the eastern neighbor, which is dequeued first.
        assert_eq!(agent.stats().extends, 2);
    }

    #[test]
    fn test_puzzle_one_move_by_bounded_dfs() {
        init_tracing();
        let puzzle: SlidePuzzleState = "3\n3 1 2\n0 4 5\n6 7 8\n".parse().unwrap();
        let mut agent = SearchAgent::new(Algorithm::Tree, Strategy::Dfs, None).unwrap();
        let result = agent.run(puzzle, |_| false, 5.0).unwrap().unwrap();

        assert!(result.is_goal());
        assert!(result.depth() < 5);
        assert!(agent.stats().extends <= 20);
    }

    #[test]
    fn test_spotless_a_star_matches_uniform_cost() {
        init_tracing();
        let room: SpotlessRoombaState = "3 4\n0 0\n. . ~ .\n. # ~ ?\n+ . . .\n".parse().unwrap();
        let heuristic = lookup_heuristic(roomba::SPOTLESS_HEURISTICS, "max-of-all").unwrap();

        let mut ucs = SearchAgent::new(Algorithm::Graph, Strategy::Ucs, None).unwrap();
        let optimum = ucs.run(room.clone(), |_| false, f64::INFINITY).unwrap().unwrap();
        let mut astar = SearchAgent::new(Algorithm::Tree, Strategy::Astar, Some(heuristic)).unwrap();
        let result = astar.run(room, |_| false, f64::INFINITY).unwrap().unwrap();

        assert_eq!(optimum.path_cost(), 7.0);
        assert_eq!(result.path_cost(), 7.0);
        assert!(result.state().dirty().is_empty());
    }

    #[test]
    fn test_every_combination_reaches_goal() {
        init_tracing();
        for algorithm in ALGORITHMS {
            for strategy in STRATEGIES {
                let mut agent = SearchAgent::new(algorithm, strategy, table())
                    .unwrap()
                    .with_seed(11);
                let result = agent.run(weighted(), |_| false, f64::INFINITY).unwrap();
                let result = result.unwrap_or_else(|| panic!("{algorithm} x {strategy} failed"));
                assert_eq!(result.state().name(), "D", "{algorithm} x {strategy}");
            }
        }
    }

    #[test]
    fn test_runs_do_not_share_state() {
        let mut agent = SearchAgent::new(Algorithm::Graph, Strategy::Bfs, None).unwrap();
        let puzzle = SlidePuzzleState::from_file("problem_file/slidepuzzle/easy.txt").unwrap();

        let first = agent.run(puzzle.clone(), |_| false, f64::INFINITY).unwrap().unwrap();
        let first_stats = agent.stats().clone();
        let second = agent.run(puzzle, |_| false, f64::INFINITY).unwrap().unwrap();

        assert_eq!(first.feature(), second.feature());
        assert_eq!(first_stats.extends, agent.stats().extends);
        assert_eq!(first_stats.enqueues, agent.stats().enqueues);
    }

    #[test]
    fn test_random_strategy_is_reproducible() {
        let puzzle = SlidePuzzleState::from_file("problem_file/slidepuzzle/easy.txt").unwrap();
        let run = |seed: u64| {
            let mut agent = SearchAgent::new(Algorithm::Graph, Strategy::Random, None)
                .unwrap()
                .with_seed(seed);
            let result = agent.run(puzzle.clone(), |_| false, 8.0).unwrap();
            (result.map(|n| n.depth()), agent.stats().extends)
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn test_callback_stop_is_not_an_error() {
        let mut agent = SearchAgent::new(Algorithm::Tree, Strategy::Bfs, None).unwrap();
        let result = agent.run(weighted(), |_| true, f64::INFINITY).unwrap();
        assert!(result.is_none());
        assert_eq!(agent.stats().extends, 1);
        assert_eq!(agent.stats().result_depth, None);
    }

    #[test]
    fn test_cancelled_token_stops_run() {
        let token = CancelToken::new();
        token.cancel();

        let mut agent = SearchAgent::new(Algorithm::Graph, Strategy::Bfs, None).unwrap();
        let result = agent
            .run_with_token(weighted(), &token, |_| false, f64::INFINITY)
            .unwrap();
        assert!(result.is_none());
        assert_eq!(agent.stats().extends, 1);

        // Anytime search still hands back the root it extended.
        let mut anytime = SearchAgent::new(Algorithm::Anytime, Strategy::Bfs, table()).unwrap();
        let best = anytime
            .run_with_token(weighted(), &token, |_| false, f64::INFINITY)
            .unwrap()
            .unwrap();
        assert_eq!(best.state().name(), "A");
    }

    #[test]
    fn test_missing_heuristic() {
        assert!(matches!(
            SearchAgent::<GraphState>::new(Algorithm::Tree, Strategy::Astar, None),
            Err(SearchError::MissingHeuristic { .. })
        ));
        assert!(matches!(
            SearchAgent::<GraphState>::new(Algorithm::Anytime, Strategy::Bfs, None),
            Err(SearchError::MissingHeuristic { .. })
        ));
    }
}
