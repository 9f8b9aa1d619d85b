use crate::problem::Domain;
use crate::strategy::Strategy;
use crate::traversal::Algorithm;

use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(
    name = "Goal Search",
    about = "Uninformed and informed state-space search over pluggable problem domains.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the problem file")]
    pub problem: Option<String>,

    #[arg(long, value_enum, help = "Problem domain")]
    pub domain: Option<Domain>,

    #[arg(long, value_enum, help = "Traversal algorithm")]
    pub algorithm: Option<Algorithm>,

    #[arg(long, value_enum, help = "Frontier strategy")]
    pub strategy: Option<Strategy>,

    #[arg(long, help = "Heuristic name from the domain catalog")]
    pub heuristic: Option<String>,

    #[arg(long, help = "Depth or path cost bound for admitting states")]
    pub cutoff: Option<f64>,

    #[arg(long, help = "Seed for the random strategy")]
    pub seed: Option<u64>,

    #[arg(long, help = "Stop after this many extensions")]
    pub max_extends: Option<usize>,

    #[arg(long, help = "Stop after this many milliseconds")]
    pub time_limit_ms: Option<u64>,

    #[arg(long, help = "Path to the JSON report")]
    pub output_path: Option<String>,

    #[arg(long, help = "Log filter, e.g. info or goal_search=trace")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub problem: String,
    pub domain: Domain,
    pub algorithm: Algorithm,
    pub strategy: Strategy,
    pub heuristic: Option<String>,
    pub cutoff: Option<f64>,
    pub seed: u64,
    pub max_extends: Option<usize>,
    pub time_limit_ms: Option<u64>,
    pub output_path: Option<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            problem: "problem_file/graph/weighted.txt".to_string(),
            domain: Domain::Graph,
            algorithm: Algorithm::Graph,
            strategy: Strategy::Ucs,
            heuristic: None,
            cutoff: None,
            seed: 0,
            max_extends: None,
            time_limit_ms: None,
            output_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("failed to parse config")
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        Self::from_yaml_str(&yaml).with_context(|| format!("error with config file {path}"))
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(problem) = &cli.problem {
            self.problem = problem.clone();
        }
        if let Some(domain) = cli.domain {
            self.domain = domain;
        }
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(strategy) = cli.strategy {
            self.strategy = strategy;
        }
        if let Some(heuristic) = &cli.heuristic {
            self.heuristic = Some(heuristic.clone());
        }
        if let Some(cutoff) = cli.cutoff {
            self.cutoff = Some(cutoff);
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(max_extends) = cli.max_extends {
            self.max_extends = Some(max_extends);
        }
        if let Some(time_limit_ms) = cli.time_limit_ms {
            self.time_limit_ms = Some(time_limit_ms);
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = Some(output_path.clone());
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = log_level.clone();
        }
        self.validate()?;
        Ok(self)
    }

    /// Bound handed to the agent. Unset means unbounded.
    pub fn cutoff(&self) -> f64 {
        self.cutoff.unwrap_or(f64::INFINITY)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(cutoff) = self.cutoff {
            if cutoff.is_nan() || cutoff <= 0.0 {
                return Err(anyhow!("Cutoff must be positive, got {cutoff}"));
            }
        }

        let needs_heuristic = self.strategy.is_informed() || self.algorithm.needs_heuristic();
        match &self.heuristic {
            None if needs_heuristic => {
                return Err(anyhow!(
                    "{} search with {} strategy needs a heuristic, one of: {}",
                    self.algorithm,
                    self.strategy,
                    self.domain.heuristic_names().join(", ")
                ));
            }
            Some(name) if !self.domain.heuristic_names().contains(&name.as_str()) => {
                return Err(anyhow!(
                    "Unknown heuristic {name:?} for {:?}, expected one of: {}",
                    self.domain,
                    self.domain.heuristic_names().join(", ")
                ));
            }
            _ => {}
        }
        Ok(())
    }
}
