use super::{zero_heuristic, Catalog, Lines};
use crate::error::SearchError;
use crate::state::State;

use anyhow::Context;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

/// Explicit weighted directed graph with a per-node heuristic value.
#[derive(Debug)]
pub struct Graph {
    names: Vec<String>,
    index: HashMap<String, usize>,
    // `None` marks a goal node.
    edges: Vec<Option<Vec<(usize, f64)>>>,
    heuristics: Vec<f64>,
}

impl Graph {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn name(&self, node: usize) -> &str {
        &self.names[node]
    }

    fn cost(&self, from: usize, to: usize) -> Option<f64> {
        self.edges[from]
            .as_ref()?
            .iter()
            .find(|(target, _)| *target == to)
            .map(|(_, cost)| *cost)
    }
}

/// Move along an edge to the named target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphAction {
    pub to: usize,
}

#[derive(Debug, Clone)]
pub struct GraphState {
    graph: Rc<Graph>,
    node: usize,
}

impl GraphState {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read graph problem {}", path.display()))?;
        text.parse()
            .with_context(|| format!("error with graph problem {}", path.display()))
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn name(&self) -> &str {
        self.graph.name(self.node)
    }

    /// Action that moves to the node called `name`, if such a node exists.
    pub fn action_to(&self, name: &str) -> Option<GraphAction> {
        self.graph.index_of(name).map(|to| GraphAction { to })
    }

    pub fn table_heuristic(&self) -> f64 {
        self.graph.heuristics[self.node]
    }
}

impl State for GraphState {
    type Action = GraphAction;
    type Feature = usize;

    fn feature(&self) -> usize {
        self.node
    }

    fn is_goal(&self) -> bool {
        self.graph.edges[self.node].is_none()
    }

    fn legal_actions(&self) -> Vec<GraphAction> {
        self.graph.edges[self.node]
            .iter()
            .flatten()
            .map(|(to, _)| GraphAction { to: *to })
            .collect()
    }

    fn is_legal_action(&self, action: &GraphAction) -> bool {
        self.graph.cost(self.node, action.to).is_some()
    }

    fn transition(&self, action: &GraphAction) -> (Self, f64) {
        let cost = self.graph.cost(self.node, action.to).unwrap_or_default();
        (
            GraphState {
                graph: Rc::clone(&self.graph),
                node: action.to,
            },
            cost,
        )
    }

    fn describe_action(&self, action: &GraphAction) -> String {
        format!("{} -> {}", self.name(), self.graph.name(action.to))
    }
}

impl fmt::Display for GraphState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses the text format:
///
/// ```text
/// 3
/// A ? 2 : B,1; C,4
/// B ? 1 : C,1
/// C ? 0 : goal
/// A
/// ```
///
/// The first line is the node count, then one line per node with its
/// heuristic value and outgoing `target,cost` edges (or `goal`), then the name
/// of the initial node.
impl FromStr for GraphState {
    type Err = SearchError;

    fn from_str(text: &str) -> Result<Self, SearchError> {
        let mut lines = Lines::new(text);
        let count = lines
            .next_line("node count")?
            .parse::<usize>()
            .map_err(|_| lines.error("node count must be a non-negative integer"))?;

        let mut names = Vec::with_capacity(count);
        let mut raw_edges = Vec::with_capacity(count);
        let mut heuristics = Vec::with_capacity(count);
        for _ in 0..count {
            let line = lines.next_line("node definition")?;
            let (head, transitions) = line
                .split_once(':')
                .ok_or_else(|| lines.error("expected `NAME ? h : edges`"))?;
            let (name, heuristic) = head
                .split_once('?')
                .ok_or_else(|| lines.error("expected `NAME ? h` before `:`"))?;
            let heuristic = heuristic
                .trim()
                .parse::<f64>()
                .map_err(|_| lines.error(format!("invalid heuristic {:?}", heuristic.trim())))?;
            let name = name.trim();
            if names.iter().any(|known| known == name) {
                return Err(lines.error(format!("duplicate node {name:?}")));
            }
            names.push(name.to_string());
            heuristics.push(heuristic);
            raw_edges.push((lines.line(), transitions.trim()));
        }

        let index: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        let mut edges = Vec::with_capacity(count);
        for (line, transitions) in raw_edges {
            if transitions.eq_ignore_ascii_case("goal") {
                edges.push(None);
                continue;
            }
            let mut targets = Vec::new();
            for edge in transitions.split(';').map(str::trim).filter(|e| !e.is_empty()) {
                let (to, cost) = edge
                    .split_once(',')
                    .ok_or_else(|| SearchError::malformed(line, format!("edge {edge:?} needs `target,cost`")))?;
                let to = *index.get(to.trim()).ok_or_else(|| {
                    SearchError::malformed(line, format!("unknown node {:?}", to.trim()))
                })?;
                let cost = cost
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|cost| *cost >= 0.0)
                    .ok_or_else(|| SearchError::malformed(line, format!("invalid cost in {edge:?}")))?;
                targets.push((to, cost));
            }
            edges.push(Some(targets));
        }

        let initial = lines.next_line("initial node")?;
        let node = *index
            .get(initial)
            .ok_or_else(|| lines.error(format!("unknown initial node {initial:?}")))?;

        Ok(GraphState {
            graph: Rc::new(Graph {
                names,
                index,
                edges,
                heuristics,
            }),
            node,
        })
    }
}

fn table_heuristic(state: &GraphState) -> f64 {
    state.table_heuristic()
}

pub const HEURISTICS: Catalog<GraphState> = &[
    ("zero", zero_heuristic::<GraphState>),
    ("table", table_heuristic),
];
