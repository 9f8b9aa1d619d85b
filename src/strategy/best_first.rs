use super::{within_cost, Frontier, Heuristic};
use crate::state::{SearchNode, State};

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

enum Priority<S: State> {
    PathCost,
    Heuristic(Heuristic<S>),
    PathCostPlusHeuristic(Heuristic<S>),
}

impl<S: State> Priority<S> {
    fn of(&self, node: &SearchNode<S>) -> f64 {
        match self {
            Priority::PathCost => node.path_cost(),
            Priority::Heuristic(h) => h(node.state()),
            Priority::PathCostPlusHeuristic(h) => node.path_cost() + h(node.state()),
        }
    }
}

struct Entry<S: State> {
    priority: f64,
    sequence: u64,
    node: Rc<SearchNode<S>>,
}

impl<S: State> PartialEq for Entry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S: State> Eq for Entry<S> {}

// Implement ordering for the priority queue where lower priorities are popped
// first. Equal priorities fall back to insertion order.
impl<S: State> Ord for Entry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<S: State> PartialOrd for Entry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Binary-heap frontier ordered by path cost, heuristic, or their sum.
///
/// Admission is always bounded by path cost, whichever priority is used.
pub struct BestFirstFrontier<S: State> {
    heap: BinaryHeap<Entry<S>>,
    priority: Priority<S>,
    sequence: u64,
}

impl<S: State> BestFirstFrontier<S> {
    fn with_priority(priority: Priority<S>) -> Self {
        BestFirstFrontier {
            heap: BinaryHeap::new(),
            priority,
            sequence: 0,
        }
    }

    /// Uniform-cost: lowest path cost first.
    pub fn uniform_cost() -> Self {
        Self::with_priority(Priority::PathCost)
    }

    /// Greedy best-first: lowest heuristic first.
    pub fn greedy(heuristic: Heuristic<S>) -> Self {
        Self::with_priority(Priority::Heuristic(heuristic))
    }

    /// A*: lowest path cost plus heuristic first.
    pub fn a_star(heuristic: Heuristic<S>) -> Self {
        Self::with_priority(Priority::PathCostPlusHeuristic(heuristic))
    }

    /// Priority of the node that would be dequeued next.
    pub fn peek_priority(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.priority)
    }
}

impl<S: State> Frontier<S> for BestFirstFrontier<S> {
    fn enqueue(&mut self, node: Rc<SearchNode<S>>, cutoff: f64) -> bool {
        if !within_cost(&node, cutoff) {
            return false;
        }
        let priority = self.priority.of(&node);
        self.heap.push(Entry {
            priority,
            sequence: self.sequence,
            node,
        });
        self.sequence += 1;
        true
    }

    fn dequeue(&mut self) -> Option<Rc<SearchNode<S>>> {
        self.heap.pop().map(|entry| entry.node)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}
