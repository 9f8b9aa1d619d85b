use super::{within_depth, Frontier};
use crate::state::{SearchNode, State};

use std::rc::Rc;

/// Last-in-first-out stack, bounded by depth.
pub struct DepthFirstFrontier<S: State> {
    stack: Vec<Rc<SearchNode<S>>>,
}

impl<S: State> DepthFirstFrontier<S> {
    pub fn new() -> Self {
        DepthFirstFrontier { stack: Vec::new() }
    }
}

impl<S: State> Default for DepthFirstFrontier<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> Frontier<S> for DepthFirstFrontier<S> {
    fn enqueue(&mut self, node: Rc<SearchNode<S>>, cutoff: f64) -> bool {
        if !within_depth(&node, cutoff) {
            return false;
        }
        self.stack.push(node);
        true
    }

    fn dequeue(&mut self) -> Option<Rc<SearchNode<S>>> {
        self.stack.pop()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }
}
