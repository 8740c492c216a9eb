use std::collections::HashMap;
use std::sync::Arc;

use super::*;
use crate::node::*;
use crate::types::*;

pub const START: &str = "_START_";
pub const END: &str = "_END_";

/// Steps a single run may take before it is treated as runaway.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// A graph that executes nodes in a defined order
#[derive(Debug)]
pub struct Graph<State: GraphState, BuildState = NotBuilt> {
    graph_name: String,
    nodes: HashMap<String, Arc<dyn Node<State>>>,
    edges: HashMap<String, Edge<State>>,
    configs: HashMap<String, NodeConfig>,
    recursion_limit: usize,
    _build_state: std::marker::PhantomData<BuildState>,
}

impl<S: GraphState, B> Graph<S, B> {
    pub fn name(&self) -> &str {
        &self.graph_name
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }
}

impl<S> Graph<S, NotBuilt>
where
    S: GraphState,
{
    /// Create a new graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            graph_name: name.into(),
            nodes: HashMap::new(),
            edges: HashMap::new(),
            configs: HashMap::new(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            _build_state: std::marker::PhantomData,
        }
    }

    /// Add a node to the graph
    pub fn add_node<N>(&mut self, node: N) -> &mut Self
    where
        N: Node<S> + 'static,
    {
        self.nodes.insert(node.name().to_string(), Arc::new(node));
        self
    }

    /// Add a direct edge between nodes
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.insert(from.into(), Edge::Direct(to.into()));
        self
    }

    /// Add a conditional edge from a node
    pub fn add_conditional_edge<F>(&mut self, from: impl Into<String>, condition: F) -> &mut Self
    where
        F: Fn(&S) -> String + Send + Sync + 'static,
    {
        self.edges
            .insert(from.into(), Edge::Conditional(Arc::new(condition)));
        self
    }

    /// Configure a node with specific settings
    pub fn configure_node(&mut self, name: impl Into<String>, config: NodeConfig) -> &mut Self {
        self.configs.insert(name.into(), config);
        self
    }

    /// Maximum number of node executions in a single run
    pub fn with_recursion_limit(&mut self, limit: usize) -> &mut Self {
        self.recursion_limit = limit;
        self
    }

    /// Validate the structure and make the graph ready for execution
    pub fn build(self) -> GraphResult<Graph<S, Built>> {
        if !self.edges.contains_key(START) {
            return Err(GraphError::InvalidState(format!(
                "graph {} has no edge from START",
                self.graph_name
            )));
        }

        for (from, edge) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(GraphError::NodeNotFound(from.clone()));
            }
            if let Edge::Direct(to) = edge {
                if to != END && !self.nodes.contains_key(to) {
                    return Err(GraphError::NodeNotFound(to.clone()));
                }
            }
        }

        Ok(Graph {
            graph_name: self.graph_name,
            nodes: self.nodes,
            edges: self.edges,
            configs: self.configs,
            recursion_limit: self.recursion_limit,
            _build_state: std::marker::PhantomData,
        })
    }
}

impl<S> Graph<S, Built>
where
    S: GraphState,
{
    /// Run the graph with an initial state
    pub async fn run(&self, ctx: &Context, initial_state: S) -> GraphResult<S> {
        let mut current_state = initial_state;
        let mut current_node = START.to_string();
        let mut steps = 0usize;

        loop {
            let next_node = match self.edges.get(&current_node) {
                Some(edge) => edge.next(&current_state),
                None => {
                    return Err(GraphError::InvalidTransition(format!(
                        "No transition defined from node: {}",
                        current_node
                    )))
                }
            };

            if next_node == END {
                break;
            }

            steps += 1;
            if steps > self.recursion_limit {
                return Err(GraphError::RecursionLimit(self.recursion_limit));
            }

            let node = self
                .nodes
                .get(&next_node)
                .ok_or_else(|| GraphError::NodeNotFound(next_node.clone()))?;

            let config = self.configs.get(&next_node).cloned().unwrap_or_default();

            tracing::debug!(graph = %self.graph_name, node = %next_node, step = steps, "running node");

            let output = self
                .process_with_retry(ctx, node.as_ref(), &next_node, &config, &current_state)
                .await?;

            current_state = match output {
                NodeOutput::Full(new_state) => new_state,
                NodeOutput::Updates(updates) => {
                    current_state.apply_many(updates);
                    current_state
                }
            };

            current_node = next_node;
        }

        Ok(current_state)
    }

    async fn process_with_retry(
        &self,
        ctx: &Context,
        node: &dyn Node<S>,
        name: &str,
        config: &NodeConfig,
        state: &S,
    ) -> Result<NodeOutput<S>, NodeError> {
        let mut node_ctx = ctx.clone();
        let mut attempts = 0;

        loop {
            attempts += 1;
            if attempts > 1 {
                node_ctx = node_ctx.child();
            }

            let result =
                tokio::time::timeout(config.timeout, node.process(&node_ctx, state.clone())).await;

            let retry_left = attempts < config.attempts();
            match result {
                Ok(Ok(output)) => return Ok(output),
                Ok(Err(e)) if retry_left => {
                    tracing::warn!(node = %name, attempt = attempts, error = %e, "node failed, retrying");
                }
                Ok(Err(e)) => return Err(e),
                Err(_) if retry_left => {
                    tracing::warn!(node = %name, attempt = attempts, "node timed out, retrying");
                }
                Err(_) => {
                    return Err(NodeError::Execution(format!(
                        "Node {} timed out after {} attempts",
                        name, attempts
                    )))
                }
            }
        }
    }
}
