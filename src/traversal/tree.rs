use super::{extend, Progress, Traversal};
use crate::stat::Stats;
use crate::state::{SearchNode, State};
use crate::strategy::Frontier;

use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// Search without an extended filter.
///
/// The same configuration may be enqueued and extended many times; only the
/// immediate parent is excluded when extending.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSearch;

impl<S: State> Traversal<S> for TreeSearch {
    #[instrument(skip_all, name = "tree_search", fields(cutoff = cutoff), level = "debug")]
    fn search(
        &mut self,
        frontier: &mut dyn Frontier<S>,
        root: Rc<SearchNode<S>>,
        cutoff: f64,
        progress: &mut Progress<'_, S>,
        stats: &mut Stats,
    ) -> Option<Rc<SearchNode<S>>> {
        frontier.enqueue(root, f64::INFINITY);

        while let Some(node) = frontier.dequeue() {
            trace!("dequeue {node:?}");
            if node.is_goal() {
                debug!("goal found at depth {}", node.depth());
                return Some(node);
            }

            extend(&node, frontier, cutoff, stats);

            if progress(&node) {
                debug!("terminated by progress callback");
                return None;
            }
        }

        debug!("frontier exhausted");
        None
    }
}
