//! Typestate markers: a `Graph<S, NotBuilt>` accepts nodes and edges, a
//! `Graph<S, Built>` has been validated and can only be run.

#[derive(Debug, Clone, Copy)]
pub struct NotBuilt;

#[derive(Debug, Clone, Copy)]
pub struct Built;
