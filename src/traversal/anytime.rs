use super::{extend, Progress, Traversal};
use crate::stat::Stats;
use crate::state::{SearchNode, State};
use crate::strategy::{Frontier, Heuristic};

use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// Best node seen so far: lowest heuristic, then lowest path cost.
struct Incumbent<S: State> {
    node: Option<Rc<SearchNode<S>>>,
    heuristic: f64,
    path_cost: f64,
}

impl<S: State> Incumbent<S> {
    fn new() -> Self {
        Incumbent {
            node: None,
            heuristic: f64::INFINITY,
            path_cost: f64::INFINITY,
        }
    }

    fn offer(&mut self, node: &Rc<SearchNode<S>>, heuristic: f64) {
        let better = heuristic < self.heuristic
            || (heuristic == self.heuristic && node.path_cost() < self.path_cost);
        if better {
            trace!("new incumbent {node:?} with heuristic {heuristic}");
            self.node = Some(Rc::clone(node));
            self.heuristic = heuristic;
            self.path_cost = node.path_cost();
        }
    }
}

/// Graph search that never comes back empty-handed once it has extended a
/// node.
///
/// If no goal is reached before the frontier empties or the progress callback
/// stops the run, the extended node closest to a goal by the heuristic is
/// returned instead.
pub struct AnytimeSearch<S: State> {
    heuristic: Heuristic<S>,
}

impl<S: State> AnytimeSearch<S> {
    pub fn new(heuristic: Heuristic<S>) -> Self {
        AnytimeSearch { heuristic }
    }
}

impl<S: State> Traversal<S> for AnytimeSearch<S> {
    #[instrument(skip_all, name = "anytime_search", fields(cutoff = cutoff), level = "debug")]
    fn search(
        &mut self,
        frontier: &mut dyn Frontier<S>,
        root: Rc<SearchNode<S>>,
        cutoff: f64,
        progress: &mut Progress<'_, S>,
        stats: &mut Stats,
    ) -> Option<Rc<SearchNode<S>>> {
        let mut extended: HashSet<S::Feature> = HashSet::new();
        let mut incumbent = Incumbent::new();
        frontier.enqueue(root, f64::INFINITY);

        while let Some(node) = frontier.dequeue() {
            if !extended.insert(node.feature()) {
                continue;
            }

            trace!("dequeue {node:?}");
            if node.is_goal() {
                debug!("goal found at depth {}", node.depth());
                return Some(node);
            }

            extend(&node, frontier, cutoff, stats);
            incumbent.offer(&node, (self.heuristic)(node.state()));

            if progress(&node) {
                debug!("terminated by progress callback");
                break;
            }
        }

        debug!(
            "no goal reached, returning incumbent with heuristic {}",
            incumbent.heuristic
        );
        incumbent.node
    }
}
