//! Graph construction from network data.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, warn};

use crate::domain::{LineId, StationEntry, StationName};
use crate::network::LineSnapshot;

use super::error::MalformedNetworkError;
use super::types::{Edge, Graph, Node, NodeId};

/// Build a routing graph from a set of lines.
///
/// Each line's stations are walked in position order and every consecutive
/// pair gets an edge in both directions, tagged with the line id and the
/// distance stored on the later station. Stations are merged by exact name,
/// so a station on several lines becomes one node with edges on each.
///
/// Fails if any line has fewer than two stations, or positions that are not
/// exactly `1..=n`. Nothing is returned on failure.
pub fn build(lines: &[LineSnapshot]) -> Result<Graph, MalformedNetworkError> {
    let mut graph = Graph::default();
    let mut seen_lines = HashSet::new();

    for line in lines {
        if !seen_lines.insert(line.id) {
            return Err(MalformedNetworkError::DuplicateLine(line.id));
        }

        let stations = ordered_stations(line)?;

        for pair in stations.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let a = graph.upsert_node(from, line.id);
            let b = graph.upsert_node(to, line.id);
            let distance = to.distance_from_previous.unwrap_or(0.0);

            graph.adjacency[a.0].push(Edge {
                to: b,
                line: line.id,
                distance,
            });
            graph.adjacency[b.0].push(Edge {
                to: a,
                line: line.id,
                distance,
            });
        }

        graph.lines.insert(line.id, line.line());
    }

    for node in graph.nodes.iter().filter(|n| n.serves_multiple_lines()) {
        if !node.is_interchange {
            warn!(
                station = %node.name,
                lines = node.lines.len(),
                "station serves several lines but is not flagged as an interchange"
            );
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        lines = graph.line_count(),
        "built routing graph"
    );

    Ok(graph)
}

/// Sort a line's stations by position and check the sequence.
fn ordered_stations(line: &LineSnapshot) -> Result<Vec<&StationEntry>, MalformedNetworkError> {
    if line.stations.len() < 2 {
        return Err(MalformedNetworkError::TooFewStations {
            line: line.id,
            count: line.stations.len(),
        });
    }

    let mut stations: Vec<&StationEntry> = line.stations.iter().collect();
    stations.sort_by_key(|s| s.position);

    let mut positions = BTreeSet::new();
    for (expected, station) in (1u32..).zip(&stations) {
        if !positions.insert(station.position) {
            return Err(MalformedNetworkError::DuplicatePosition {
                line: line.id,
                position: station.position,
            });
        }
        if station.position != expected {
            return Err(MalformedNetworkError::NonSequentialPosition {
                line: line.id,
                expected,
                found: station.position,
            });
        }
    }

    Ok(stations)
}

impl Graph {
    /// Find or create the node for a station and record its membership.
    fn upsert_node(&mut self, entry: &StationEntry, line: LineId) -> NodeId {
        let id = match self.index.get(entry.name.as_str()) {
            Some(&id) => id,
            None => self.push_node(entry.name.clone()),
        };

        let node = &mut self.nodes[id.0];
        node.lines.insert(line);
        node.is_interchange |= entry.is_interchange;
        id
    }

    fn push_node(&mut self, name: StationName) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.clone(),
            lines: BTreeSet::new(),
            is_interchange: false,
        });
        self.adjacency.push(Vec::new());
        self.index.insert(name, id);
        id
    }
}
