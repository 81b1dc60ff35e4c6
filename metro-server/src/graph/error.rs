//! Graph build errors.

use crate::domain::LineId;

/// The network data cannot be turned into a routing graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedNetworkError {
    /// A line needs at least two stations to have any edges
    #[error("line {line} has {count} station(s); at least 2 are required")]
    TooFewStations { line: LineId, count: usize },

    /// Two stations on one line share a sequence position
    #[error("line {line} has more than one station at position {position}")]
    DuplicatePosition { line: LineId, position: u32 },

    /// Positions on a line must run 1, 2, 3, ... without gaps
    #[error("line {line} expected a station at position {expected}, found {found}")]
    NonSequentialPosition {
        line: LineId,
        expected: u32,
        found: u32,
    },

    /// The same line id appears twice in the snapshot
    #[error("line {0} appears more than once")]
    DuplicateLine(LineId),
}
