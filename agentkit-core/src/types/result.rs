use crate::{GraphError, GraphState, NodeError};

/// What a node hands back to the runner.
#[derive(Debug)]
pub enum NodeOutput<S: GraphState> {
    /// Replaces the state wholesale.
    Full(S),
    /// Applied in order through `GraphState::apply`; empty means no change.
    Updates(Vec<S::Update>),
}

impl<S: GraphState> NodeOutput<S> {
    pub fn update(update: S::Update) -> Self {
        Self::Updates(vec![update])
    }

    pub fn unchanged() -> Self {
        Self::Updates(Vec::new())
    }
}

pub type NodeResult<S> = Result<NodeOutput<S>, NodeError>;

pub type GraphResult<T> = Result<T, GraphError>;
