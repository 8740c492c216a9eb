mod core;
mod edges;
mod marker;

pub use core::{Graph, DEFAULT_RECURSION_LIMIT, END, START};
pub use edges::{Condition, Edge};
pub use marker::{Built, NotBuilt};
