//! Domain types for the metro route finder.
//!
//! This module contains the value types shared by the network store, the
//! graph builder and the planner. Types that carry invariants enforce them
//! at construction time.

mod line;
mod station;

pub use line::{Line, LineId, StationEntry};
pub use station::{InvalidStationName, StationName};
