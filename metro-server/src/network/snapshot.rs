//! Network snapshots and where they come from.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Line, LineId, StationEntry};

use super::error::SnapshotError;

/// One line together with its station memberships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub id: LineId,
    pub name: String,
    pub color: String,

    /// Memberships in the order they were supplied; the graph builder
    /// orders them by position.
    #[serde(default)]
    pub stations: Vec<StationEntry>,
}

impl LineSnapshot {
    /// Returns the line record without its stations.
    pub fn line(&self) -> Line {
        Line::new(self.id, self.name.clone(), self.color.clone())
    }
}

/// A consistent view of every line and its stations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub lines: Vec<LineSnapshot>,
}

/// Something that can supply the current network snapshot.
///
/// This abstraction lets the service start from a file in production and
/// from an in-memory snapshot in tests.
pub trait SnapshotSource {
    /// Read the current snapshot.
    fn read_snapshot(&self) -> Result<NetworkSnapshot, SnapshotError>;
}

impl SnapshotSource for NetworkSnapshot {
    fn read_snapshot(&self) -> Result<NetworkSnapshot, SnapshotError> {
        Ok(self.clone())
    }
}

/// A snapshot stored as JSON on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for SnapshotFile {
    fn read_snapshot(&self) -> Result<NetworkSnapshot, SnapshotError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| SnapshotError::Io {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| SnapshotError::Json {
            path: self.path.clone(),
            source,
        })
    }
}
