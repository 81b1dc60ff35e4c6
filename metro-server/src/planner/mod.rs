//! Route planning over the routing graph.
//!
//! This module implements the route search that answers: "what is the
//! route between these two stations with the fewest stops, and among
//! those the fewest line changes?" and prices the route it finds.
//!
//! Routes are chosen first and priced afterwards; the tariff never
//! influences which route wins.

mod config;
mod fare;
mod search;


pub use config::Tariff;
pub use fare::{Quote, quote};
pub use search::{LineChange, Planner, RouteError, RouteResult};
