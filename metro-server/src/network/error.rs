//! Network data error types.

use std::path::PathBuf;

use crate::domain::{LineId, StationName};

/// Errors from reading a network snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot file is not valid snapshot JSON
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from network store operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// No line with this id
    #[error("line with id {0} not found")]
    LineNotFound(LineId),

    /// Another line already uses this name
    #[error("line with name '{0}' already exists")]
    DuplicateLineName(String),

    /// Two lines in a snapshot share an id
    #[error("line id {0} appears more than once")]
    DuplicateLineId(LineId),

    /// Lines must be emptied before they are deleted
    #[error("cannot delete line {id}: it still has {count} station(s)")]
    LineHasStations { id: LineId, count: usize },

    /// The station is already on this line
    #[error("station '{station}' already exists on line '{line}'")]
    DuplicateStationName { line: String, station: StationName },

    /// The sequence position is already used on this line
    #[error("station number {position} is already taken on line '{line}'")]
    PositionTaken { line: String, position: u32 },

    /// The station is not a member of this line
    #[error("station '{station}' is not on line {line}")]
    StationNotOnLine { line: LineId, station: StationName },

    /// Every line id up to the maximum is in use
    #[error("no line ids left to assign")]
    LineIdsExhausted,

    /// Field-level validation failure
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
