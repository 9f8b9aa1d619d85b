mod best_first;
mod breadth_first;
mod depth_first;
mod random;

pub use best_first::BestFirstFrontier;
pub use breadth_first::BreadthFirstFrontier;
pub use depth_first::DepthFirstFrontier;
pub use random::RandomFrontier;

use crate::error::SearchError;
use crate::state::{SearchNode, State};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Estimate of remaining cost to a goal. Assumed pure and non-negative.
pub type Heuristic<S> = Rc<dyn Fn(&S) -> f64>;

/// Storage and selection discipline for candidate nodes of one run.
pub trait Frontier<S: State> {
    /// Hold `node` unless it fails the cutoff. Returns whether it was admitted.
    fn enqueue(&mut self, node: Rc<SearchNode<S>>, cutoff: f64) -> bool;

    fn dequeue(&mut self) -> Option<Rc<SearchNode<S>>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Depth-bounded strategies compare the path length against the cutoff.
pub(crate) fn within_depth<S: State>(node: &SearchNode<S>, cutoff: f64) -> bool {
    (node.depth() as f64) < cutoff
}

// Cost-bounded strategies compare the accumulated path cost instead.
pub(crate) fn within_cost<S: State>(node: &SearchNode<S>, cutoff: f64) -> bool {
    node.path_cost() < cutoff
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Random,
    Dfs,
    Bfs,
    Ucs,
    Greedy,
    Astar,
}

impl Strategy {
    pub fn is_informed(self) -> bool {
        matches!(self, Strategy::Greedy | Strategy::Astar)
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Random => "random",
            Strategy::Dfs => "dfs",
            Strategy::Bfs => "bfs",
            Strategy::Ucs => "ucs",
            Strategy::Greedy => "greedy",
            Strategy::Astar => "astar",
        }
    }

    /// Build an empty frontier for one run.
    pub fn build<S: State + 'static>(
        self,
        heuristic: Option<&Heuristic<S>>,
        seed: u64,
    ) -> Result<Box<dyn Frontier<S>>, SearchError> {
        let require_heuristic = || {
            heuristic.cloned().ok_or_else(|| SearchError::MissingHeuristic {
                what: format!("strategy {self}"),
            })
        };

        let frontier: Box<dyn Frontier<S>> = match self {
            Strategy::Random => Box::new(RandomFrontier::new(seed)),
            Strategy::Dfs => Box::new(DepthFirstFrontier::new()),
            Strategy::Bfs => Box::new(BreadthFirstFrontier::new()),
            Strategy::Ucs => Box::new(BestFirstFrontier::uniform_cost()),
            Strategy::Greedy => Box::new(BestFirstFrontier::greedy(require_heuristic()?)),
            Strategy::Astar => Box::new(BestFirstFrontier::a_star(require_heuristic()?)),
        };
        Ok(frontier)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
