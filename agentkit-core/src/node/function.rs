use crate::node::{Context, Node};
use crate::types::{GraphState, NodeResult};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;

/// Wraps an async closure as a graph node. The future it returns may not
/// borrow the context, so copy out whatever metadata it needs first.
pub struct FunctionNode<S, F> {
    name: String,
    f: F,
    _phantom: std::marker::PhantomData<fn(S)>,
}

impl<S, F, Fut> FunctionNode<S, F>
where
    S: GraphState,
    F: Fn(&Context, S) -> Fut + Send + Sync,
    Fut: Future<Output = NodeResult<S>> + Send,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<S, F, Fut> Node<S> for FunctionNode<S, F>
where
    S: GraphState,
    F: Fn(&Context, S) -> Fut + Send + Sync,
    Fut: Future<Output = NodeResult<S>> + Send,
{
    async fn process(&self, ctx: &Context, state: S) -> NodeResult<S> {
        (self.f)(ctx, state).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<S, F> fmt::Debug for FunctionNode<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionNode")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
