use super::{extend, Progress, Traversal};
use crate::stat::Stats;
use crate::state::{SearchNode, State};
use crate::strategy::Frontier;

use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// Search with an extended-state filter.
///
/// Membership is only checked when a node is dequeued. Filtering at enqueue
/// time would keep greedy and A* from reconsidering a configuration reached
/// later by a cheaper path.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphSearch;

impl<S: State> Traversal<S> for GraphSearch {
    #[instrument(skip_all, name = "graph_search", fields(cutoff = cutoff), level = "debug")]
    fn search(
        &mut self,
        frontier: &mut dyn Frontier<S>,
        root: Rc<SearchNode<S>>,
        cutoff: f64,
        progress: &mut Progress<'_, S>,
        stats: &mut Stats,
    ) -> Option<Rc<SearchNode<S>>> {
        let mut extended: HashSet<S::Feature> = HashSet::new();
        frontier.enqueue(root, f64::INFINITY);

        while let Some(node) = frontier.dequeue() {
            if !extended.insert(node.feature()) {
                trace!("already extended {node:?}");
                continue;
            }

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

        debug!("frontier exhausted after {} distinct states", extended.len());
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::graph::GraphState;
    use crate::strategy::{BestFirstFrontier, BreadthFirstFrontier, Heuristic};
    use crate::traversal::tests::{diamond, recorder};

    #[test]
    fn test_graph_search_extends_each_feature_once() {
        let mut log = Vec::new();
        let mut stats = Stats::default();
        let mut frontier = BreadthFirstFrontier::new();
        let result = GraphSearch.search(
            &mut frontier,
            diamond(),
            f64::INFINITY,
            &mut recorder(&mut log),
            &mut stats,
        );

        assert_eq!(result.unwrap().state().name(), "F");
        assert_eq!(log, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(stats.extends, 5);
    }

    #[test]
    fn test_graph_search_reconsiders_cheaper_path() {
        // The expensive edge A->C is found first, but C is only filtered once
        // extended, so A* still settles on the cheap route through B.
        let text = "\
4
A ? 0 : C,5; B,1
B ? 0 : C,1
C ? 0 : D,1
D ? 0 : goal
A
";
        let root = SearchNode::root(text.parse::<GraphState>().unwrap());
        let zero: Heuristic<GraphState> = Rc::new(|_: &GraphState| 0.0);
        let mut frontier = BestFirstFrontier::a_star(zero);
        let mut stats = Stats::default();
        let result = GraphSearch
            .search(
                &mut frontier,
                root,
                f64::INFINITY,
                &mut |_: &Rc<SearchNode<_>>| false,
                &mut stats,
            )
            .unwrap();

        assert_eq!(result.path_cost(), 3.0);
        let names: Vec<String> = result
            .path()
            .iter()
            .map(|n| n.state().name().to_string())
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_graph_search_callback_skips_filtered_duplicates() {
        let mut calls = 0;
        let mut stats = Stats::default();
        let mut frontier = BreadthFirstFrontier::new();
        GraphSearch.search(
            &mut frontier,
            diamond(),
            f64::INFINITY,
            &mut |_: &Rc<SearchNode<_>>| {
                calls += 1;
                false
            },
            &mut stats,
        );
        assert_eq!(calls, stats.extends);
    }
}
