//! Line and station membership types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StationName;

/// Identifier of a metro line.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u32);

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A metro line: an id plus its display name and colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub color: String,
}

impl Line {
    pub fn new(id: LineId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
        }
    }
}

/// A station's membership of one line.
///
/// The same physical station appears once per line it is on, each time
/// with its own position, interchange flag and distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationEntry {
    /// Station name (join key across lines)
    pub name: StationName,

    /// Sequence position on the line, starting at 1
    pub position: u32,

    /// Distance in km from the previous station on this line
    #[serde(default)]
    pub distance_from_previous: Option<f64>,

    /// Whether the data marks this membership as an interchange
    #[serde(default)]
    pub is_interchange: bool,
}

impl StationEntry {
    /// Create a membership with no distance and no interchange flag.
    pub fn new(name: StationName, position: u32) -> Self {
        Self {
            name,
            position,
            distance_from_previous: None,
            is_interchange: false,
        }
    }

    /// Set the distance from the previous station.
    pub fn with_distance(mut self, km: f64) -> Self {
        self.distance_from_previous = Some(km);
        self
    }

    /// Mark this membership as an interchange.
    pub fn interchange(mut self) -> Self {
        self.is_interchange = true;
        self
    }
}
