mod anytime;
mod graph;
mod tree;

pub use anytime::AnytimeSearch;
pub use graph::GraphSearch;
pub use tree::TreeSearch;

use crate::error::SearchError;
use crate::stat::Stats;
use crate::state::{SearchNode, State};
use crate::strategy::{Frontier, Heuristic};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Progress hook invoked once per processed node. Returning `true` stops the run.
pub type Progress<'a, S> = dyn FnMut(&Rc<SearchNode<S>>) -> bool + 'a;

/// Control loop that drives a frontier until a goal is found or it gives up.
pub trait Traversal<S: State> {
    fn search(
        &mut self,
        frontier: &mut dyn Frontier<S>,
        root: Rc<SearchNode<S>>,
        cutoff: f64,
        progress: &mut Progress<'_, S>,
        stats: &mut Stats,
    ) -> Option<Rc<SearchNode<S>>>;
}

/// Enqueue every neighbor of `node` except the configuration it came from.
///
/// Counts one extension for `node` and one enqueue per offered neighbor,
/// whether or not the frontier admits it under the cutoff.
pub(crate) fn extend<S: State>(
    node: &Rc<SearchNode<S>>,
    frontier: &mut dyn Frontier<S>,
    cutoff: f64,
    stats: &mut Stats,
) {
    stats.extends += 1;
    for neighbor in node.neighbors() {
        // Avoid backtracking.
        if node.is_parent(&neighbor) {
            continue;
        }
        trace!("enqueue {neighbor:?}");
        if !frontier.enqueue(neighbor, cutoff) {
            trace!("cut off");
        }
        stats.enqueues += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Tree,
    Graph,
    Anytime,
}

impl Algorithm {
    /// Whether already-extended configurations are skipped.
    pub fn filtering(self) -> bool {
        !matches!(self, Algorithm::Tree)
    }

    pub fn needs_heuristic(self) -> bool {
        matches!(self, Algorithm::Anytime)
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Tree => "tree",
            Algorithm::Graph => "graph",
            Algorithm::Anytime => "anytime",
        }
    }

    pub fn build<S: State + 'static>(
        self,
        heuristic: Option<&Heuristic<S>>,
    ) -> Result<Box<dyn Traversal<S>>, SearchError> {
        let traversal: Box<dyn Traversal<S>> = match self {
            Algorithm::Tree => Box::new(TreeSearch),
            Algorithm::Graph => Box::new(GraphSearch),
            Algorithm::Anytime => {
                let heuristic = heuristic.cloned().ok_or_else(|| {
                    SearchError::MissingHeuristic {
                        what: format!("algorithm {self}"),
                    }
                })?;
                Box::new(AnytimeSearch::new(heuristic))
            }
        };
        Ok(traversal)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
