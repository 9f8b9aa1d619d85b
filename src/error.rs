use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// An action outside `legal_actions()` was applied to a state.
    #[error("illegal action {action} from state {state}")]
    IllegalAction { action: String, state: String },

    #[error("{what} requires a heuristic but none was supplied")]
    MissingHeuristic { what: String },

    #[error("unknown heuristic {name:?}, expected one of: {available}")]
    UnknownHeuristic { name: String, available: String },

    #[error("malformed problem at line {line}: {reason}")]
    MalformedProblem { line: usize, reason: String },
}

impl SearchError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        SearchError::MalformedProblem {
            line,
            reason: reason.into(),
        }
    }
}
