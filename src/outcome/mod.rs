use serde::Deserialize;
use std::collections::HashMap;

/// Terminal state of a single node in the pipeline DAG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    Completed,
    Failed,
    Killed,
    Skipped,
}

impl NodeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeState::Completed => "completed",
            NodeState::Failed => "failed",
            NodeState::Killed => "killed",
            NodeState::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for NodeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a finished pipeline run, supplied by the invoking framework.
///
/// Read-only input: the notifier never mutates it.
#[derive(Debug, Clone, Deserialize)]
pub struct RunOutcome {
    /// True if the run finished successfully
    pub succeeded: bool,
    /// Terminal state per node identifier; may be empty if the runner does
    /// not report them
    #[serde(default)]
    pub node_states: HashMap<String, NodeState>,
}

impl RunOutcome {
    pub fn new(succeeded: bool) -> Self {
        Self {
            succeeded,
            node_states: HashMap::new(),
        }
    }
}
