use super::{within_depth, Frontier};
use crate::state::{SearchNode, State};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::rc::Rc;

/// Uniformly random choice among held nodes, bounded by depth.
pub struct RandomFrontier<S: State> {
    nodes: Vec<Rc<SearchNode<S>>>,
    rng: StdRng,
}

impl<S: State> RandomFrontier<S> {
    pub fn new(seed: u64) -> Self {
        RandomFrontier {
            nodes: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<S: State> Frontier<S> for RandomFrontier<S> {
    fn enqueue(&mut self, node: Rc<SearchNode<S>>, cutoff: f64) -> bool {
        if !within_depth(&node, cutoff) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    fn dequeue(&mut self) -> Option<Rc<SearchNode<S>>> {
        if self.nodes.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.nodes.len());
        Some(self.nodes.swap_remove(index))
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::Line;

    fn drain(frontier: &mut RandomFrontier<Line>) -> Vec<i32> {
        let mut order = Vec::new();
        while let Some(node) = frontier.dequeue() {
            order.push(node.state().at);
        }
        order
    }

    fn filled(seed: u64) -> RandomFrontier<Line> {
        let mut frontier = RandomFrontier::new(seed);
        for at in 0..20 {
            frontier.enqueue(SearchNode::root(Line { at, goal: 0 }), f64::INFINITY);
        }
        frontier
    }

    #[test]
    fn test_random_returns_every_node_once() {
        let mut order = drain(&mut filled(7));
        order.sort();
        assert_eq!(order, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_random_is_reproducible_per_seed() {
        assert_eq!(drain(&mut filled(42)), drain(&mut filled(42)));
    }

    #[test]
    fn test_random_depth_cutoff() {
        let mut frontier = RandomFrontier::new(0);
        let root = SearchNode::root(Line { at: 0, goal: 5 });
        let child = root.apply(&1).unwrap();

        assert!(frontier.enqueue(Rc::clone(&root), 1.0));
        assert!(!frontier.enqueue(child, 1.0));
        assert_eq!(frontier.len(), 1);
    }
}
