mod config;
mod context;
mod core;
mod function;
mod tests;

pub use config::{NodeConfig, NodeConfigBuilder};
pub use context::Context;
pub use core::Node;
pub use function::FunctionNode;
