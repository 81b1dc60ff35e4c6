//! In-memory routing graph.
//!
//! One node per distinct station name, and for every pair of adjacent
//! stations on a line a directed edge in each direction tagged with that
//! line. The graph is immutable once built; changes to the network produce
//! a whole new graph.

mod builder;
mod error;
mod types;

pub use builder::build;
pub use error::MalformedNetworkError;
pub use types::{Edge, EdgeView, Graph, Node, NodeId};
