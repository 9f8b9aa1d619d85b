use super::{within_depth, Frontier};
use crate::state::{SearchNode, State};

use std::collections::VecDeque;
use std::rc::Rc;

/// First-in-first-out queue, bounded by depth.
pub struct BreadthFirstFrontier<S: State> {
    queue: VecDeque<Rc<SearchNode<S>>>,
}

impl<S: State> BreadthFirstFrontier<S> {
    pub fn new() -> Self {
        BreadthFirstFrontier {
            queue: VecDeque::new(),
        }
    }
}

impl<S: State> Default for BreadthFirstFrontier<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> Frontier<S> for BreadthFirstFrontier<S> {
    fn enqueue(&mut self, node: Rc<SearchNode<S>>, cutoff: f64) -> bool {
        if !within_depth(&node, cutoff) {
            return false;
        }
        self.queue.push_back(node);
        true
    }

    fn dequeue(&mut self) -> Option<Rc<SearchNode<S>>> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}
