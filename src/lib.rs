pub mod agent;
pub mod config;
pub mod control;
pub mod error;
pub mod problem;
pub mod report;
pub mod stat;
pub mod state;
pub mod strategy;
pub mod traversal;

pub use agent::SearchAgent;
pub use control::CancelToken;
pub use error::SearchError;
pub use stat::Stats;
pub use state::{SearchNode, State};
pub use strategy::{Frontier, Heuristic, Strategy};
pub use traversal::{Algorithm, Traversal};
