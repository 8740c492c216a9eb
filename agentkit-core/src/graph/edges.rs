use std::fmt;
use std::sync::Arc;

/// Router returning the name of the next node (or `END`) for a state.
pub type Condition<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// Outgoing transition of a node.
#[derive(Clone)]
pub enum Edge<S> {
    Direct(String),
    Conditional(Condition<S>),
}

impl<S> Edge<S> {
    /// Resolve the next node for the given state.
    pub fn next(&self, state: &S) -> String {
        match self {
            Edge::Direct(target) => target.clone(),
            Edge::Conditional(condition) => condition(state),
        }
    }
}

impl<S> fmt::Debug for Edge<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Direct(target) => write!(f, "Direct({target})"),
            Edge::Conditional(_) => f.write_str("Conditional(..)"),
        }
    }
}
