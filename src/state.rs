use crate::error::SearchError;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Contract every problem domain implements so the search core can drive it.
///
/// A `State` is a bare configuration of the environment. Path bookkeeping
/// (parent, last action, depth, cost) lives in [`SearchNode`], so domains only
/// describe what a configuration is and how it changes.
pub trait State: Clone + fmt::Debug + fmt::Display {
    type Action: Clone + PartialEq + fmt::Debug;
    type Feature: Clone + Eq + Hash + fmt::Debug;

    /// Canonical, path-independent identity of this configuration.
    fn feature(&self) -> Self::Feature;

    fn is_goal(&self) -> bool;

    /// Legal actions, in the order neighbors are generated.
    fn legal_actions(&self) -> Vec<Self::Action>;

    fn is_legal_action(&self, action: &Self::Action) -> bool {
        self.legal_actions().contains(action)
    }

    /// Configuration reached by a legal action, paired with the non-negative
    /// step cost. Callers guarantee legality.
    fn transition(&self, action: &Self::Action) -> (Self, f64);

    /// Human readable description of taking `action` from this configuration.
    fn describe_action(&self, action: &Self::Action) -> String {
        format!("{action:?}")
    }
}

/// A configuration plus the path that reached it.
///
/// Nodes are immutable once built. Every transition allocates a fresh node
/// that owns a reference to its parent, so the ancestor chain can never form
/// a cycle. Equality and hashing only look at the state's feature.
pub struct SearchNode<S: State> {
    state: S,
    parent: Option<Rc<SearchNode<S>>>,
    last_action: Option<S::Action>,
    depth: usize,
    path_cost: f64,
}

impl<S: State> SearchNode<S> {
    pub fn root(state: S) -> Rc<Self> {
        Rc::new(SearchNode {
            state,
            parent: None,
            last_action: None,
            depth: 0,
            path_cost: 0.0,
        })
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn parent(&self) -> Option<&Rc<SearchNode<S>>> {
        self.parent.as_ref()
    }

    pub fn last_action(&self) -> Option<&S::Action> {
        self.last_action.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn path_cost(&self) -> f64 {
        self.path_cost
    }

    pub fn feature(&self) -> S::Feature {
        self.state.feature()
    }

    pub fn is_goal(&self) -> bool {
        self.state.is_goal()
    }

    /// Apply a legal action, producing the child node.
    pub fn apply(self: &Rc<Self>, action: &S::Action) -> Result<Rc<Self>, SearchError> {
        if !self.state.is_legal_action(action) {
            return Err(SearchError::IllegalAction {
                action: format!("{action:?}"),
                state: self.state.to_string(),
            });
        }
        Ok(self.child(action.clone()))
    }

    // Legality is the caller's responsibility.
    pub(crate) fn child(self: &Rc<Self>, action: S::Action) -> Rc<Self> {
        let (state, step_cost) = self.state.transition(&action);
        debug_assert!(step_cost >= 0.0, "negative step cost {step_cost}");
        Rc::new(SearchNode {
            state,
            parent: Some(Rc::clone(self)),
            last_action: Some(action),
            depth: self.depth + 1,
            path_cost: self.path_cost + step_cost,
        })
    }

    /// Lazily generate every neighbor reachable by one legal action.
    ///
    /// Each call enumerates afresh; nothing is cached on the node.
    pub fn neighbors(self: &Rc<Self>) -> impl Iterator<Item = Rc<Self>> + '_ {
        self.state
            .legal_actions()
            .into_iter()
            .map(move |action| self.child(action))
    }

    /// True when `other` denotes the same configuration as this node's parent.
    pub fn is_parent(&self, other: &SearchNode<S>) -> bool {
        self.parent
            .as_ref()
            .is_some_and(|parent| **parent == *other)
    }

    /// Nodes from the root to this node, inclusive.
    pub fn path(self: &Rc<Self>) -> Vec<Rc<Self>> {
        let mut path = vec![Rc::clone(self)];
        let mut current = self.parent.as_ref();
        while let Some(node) = current {
            path.push(Rc::clone(node));
            current = node.parent.as_ref();
        }
        path.reverse();
        path
    }

    /// Actions along the path from the root.
    pub fn actions(&self) -> Vec<S::Action> {
        let mut actions = Vec::with_capacity(self.depth);
        let mut current = Some(self);
        while let Some(node) = current {
            if let Some(action) = &node.last_action {
                actions.push(action.clone());
            }
            current = node.parent.as_deref();
        }
        actions.reverse();
        actions
    }

    pub fn describe_last_action(&self) -> Option<String> {
        match (&self.parent, &self.last_action) {
            (Some(parent), Some(action)) => Some(parent.state.describe_action(action)),
            _ => None,
        }
    }
}

impl<S: State> PartialEq for SearchNode<S> {
    fn eq(&self, other: &Self) -> bool {
        self.state.feature() == other.state.feature()
    }
}

impl<S: State> Eq for SearchNode<S> {}

impl<S: State> Hash for SearchNode<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.state.feature().hash(state);
    }
}

impl<S: State> fmt::Debug for SearchNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchNode")
            .field("feature", &self.state.feature())
            .field("last_action", &self.last_action)
            .field("depth", &self.depth)
            .field("path_cost", &self.path_cost)
            .finish()
    }
}

impl<S: State> fmt::Display for SearchNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.state, f)
    }
}

// Unlink long ancestor chains iteratively so dropping a deep path does not
// recurse once per ancestor.
impl<S: State> Drop for SearchNode<S> {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            match Rc::try_unwrap(node) {
                Ok(mut node) => parent = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}
