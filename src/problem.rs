pub mod graph;
pub mod roomba;
pub mod slidepuzzle;

use crate::error::SearchError;
use crate::strategy::Heuristic;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Named heuristic functions offered by a domain.
pub type Catalog<S> = &'static [(&'static str, fn(&S) -> f64)];

pub fn zero_heuristic<S>(_: &S) -> f64 {
    0.0
}

pub fn heuristic_names<S>(catalog: Catalog<S>) -> Vec<&'static str> {
    catalog.iter().map(|(name, _)| *name).collect()
}

pub fn lookup_heuristic<S: 'static>(
    catalog: Catalog<S>,
    name: &str,
) -> Result<Heuristic<S>, SearchError> {
    catalog
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, f)| {
            let f = *f;
            Rc::new(f) as Heuristic<S>
        })
        .ok_or_else(|| SearchError::UnknownHeuristic {
            name: name.to_string(),
            available: heuristic_names(catalog).join(", "),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    Graph,
    Roomba,
    SpotlessRoomba,
    Slidepuzzle,
}

impl Domain {
    pub fn name(self) -> &'static str {
        match self {
            Domain::Graph => "graph",
            Domain::Roomba => "roomba",
            Domain::SpotlessRoomba => "spotless-roomba",
            Domain::Slidepuzzle => "slidepuzzle",
        }
    }

    pub fn heuristic_names(self) -> Vec<&'static str> {
        match self {
            Domain::Graph => heuristic_names(graph::HEURISTICS),
            Domain::Roomba => heuristic_names(roomba::ROUTE_HEURISTICS),
            Domain::SpotlessRoomba => heuristic_names(roomba::SPOTLESS_HEURISTICS),
            Domain::Slidepuzzle => heuristic_names(slidepuzzle::HEURISTICS),
        }
    }
}

// Shared line reader for the plain-text problem formats.
pub(crate) struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    line: usize,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Lines {
            inner: text.lines().enumerate(),
            line: 0,
        }
    }

    /// Next non-blank line, trimmed.
    pub(crate) fn next_line(&mut self, what: &str) -> Result<&'a str, SearchError> {
        for (index, line) in self.inner.by_ref() {
            self.line = index + 1;
            let line = line.trim();
            if !line.is_empty() {
                return Ok(line);
            }
        }
        Err(SearchError::malformed(
            self.line + 1,
            format!("expected {what}, found end of input"),
        ))
    }

    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn error(&self, reason: impl Into<String>) -> SearchError {
        SearchError::malformed(self.line, reason)
    }

    /// Whitespace-separated numbers on the next line.
    pub(crate) fn numbers<T: std::str::FromStr>(
        &mut self,
        what: &str,
    ) -> Result<Vec<T>, SearchError> {
        let line = self.next_line(what)?;
        line.split_whitespace()
            .map(|token| {
                token
                    .parse::<T>()
                    .map_err(|_| self.error(format!("invalid number {token:?} in {what}")))
            })
            .collect()
    }
}
