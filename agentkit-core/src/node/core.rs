use crate::{Context, GraphState, NodeResult};
use async_trait::async_trait;
use std::fmt::Debug;

/// A named step in a graph.
#[async_trait]
pub trait Node<S: GraphState>: Send + Sync + Debug {
    async fn process(&self, ctx: &Context, state: S) -> NodeResult<S>;

    /// Name the node is registered under; edges refer to it.
    fn name(&self) -> &str;
}
