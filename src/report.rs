use crate::config::Config;
use crate::stat::Stats;
use crate::state::{SearchNode, State};

use anyhow::Context;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::rc::Rc;

/// Outcome of one run, written as JSON for external viewers.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub domain: String,
    pub algorithm: String,
    pub strategy: String,
    pub heuristic: Option<String>,
    pub cutoff: Option<f64>,
    pub found: bool,
    pub reached_goal: bool,
    /// Rendered configurations from the initial state to the result.
    pub path: Vec<String>,
    pub actions: Vec<String>,
    pub stats: Stats,
}

impl RunReport {
    /// Report for a run made with `config`, ending at `result`.
    pub fn new<S: State>(
        config: &Config,
        result: Option<&Rc<SearchNode<S>>>,
        stats: &Stats,
    ) -> Self {
        let path = result.map(|node| node.path()).unwrap_or_default();
        RunReport {
            domain: config.domain.name().to_string(),
            algorithm: config.algorithm.to_string(),
            strategy: config.strategy.to_string(),
            heuristic: config.heuristic.clone(),
            cutoff: config.cutoff,
            found: result.is_some(),
            reached_goal: result.is_some_and(|node| node.is_goal()),
            path: path.iter().map(|node| node.state().to_string()).collect(),
            actions: path
                .iter()
                .filter_map(|node| node.describe_last_action())
                .collect(),
            stats: stats.clone(),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize run report")
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("failed to create report {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("failed to write report {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::graph::GraphState;
    use crate::strategy::Strategy;

    fn one_step() -> Rc<SearchNode<GraphState>> {
        let root = SearchNode::root("2\nA ? 0 : B,2\nB ? 0 : goal\nA\n".parse::<GraphState>().unwrap());
        let action = root.state().action_to("B").unwrap();
        root.apply(&action).unwrap()
    }

    #[test]
    fn test_report_describes_path() {
        let node = one_step();
        let stats = Stats {
            extends: 1,
            enqueues: 1,
            ..Stats::default()
        };
        let report = RunReport::new(&Config::default(), Some(&node), &stats);

        assert!(report.found);
        assert!(report.reached_goal);
        assert_eq!(report.path, vec!["A", "B"]);
        assert_eq!(report.actions, vec!["A -> B"]);
        assert_eq!(report.stats.extends, 1);
    }

    #[test]
    fn test_report_without_result() {
        let report = RunReport::new::<GraphState>(&Config::default(), None, &Stats::default());
        assert!(!report.found);
        assert!(report.path.is_empty());

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["found"], false);
        assert_eq!(json["stats"]["result_cost"], serde_json::Value::Null);
    }

    #[test]
    fn test_write_report() {
        let dir = std::env::temp_dir().join("goal_search_report_test");
        let path = dir.join("nested").join("report.json");
        let config = Config {
            strategy: Strategy::Astar,
            heuristic: Some("table".to_string()),
            cutoff: Some(10.0),
            ..Config::default()
        };
        let report = RunReport::new(&config, Some(&one_step()), &Stats::default());
        report.write_to(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["domain"], "graph");
        assert_eq!(written["algorithm"], "graph");
        assert_eq!(written["strategy"], "astar");
        assert_eq!(written["heuristic"], "table");
        assert_eq!(written["cutoff"], 10.0);
        assert_eq!(written["actions"][0], "A -> B");
        let _ = std::fs::remove_dir_all(dir);
    }
}
