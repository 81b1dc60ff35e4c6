//! Graph node and edge types.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::{Line, LineId, StationName};

/// Index of a node in a [`Graph`].
///
/// Only meaningful for the graph that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// A physical station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: StationName,

    /// Every line serving this station
    pub lines: BTreeSet<LineId>,

    /// OR of the interchange flags of all memberships
    pub is_interchange: bool,
}

impl Node {
    /// Whether a passenger can change lines here.
    pub fn serves_multiple_lines(&self) -> bool {
        self.lines.len() > 1
    }
}

/// A directed connection to an adjacent station on one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub to: NodeId,
    pub line: LineId,

    /// Distance in km between the two stations
    pub distance: f64,
}

/// An edge described by station names, independent of node numbering.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeView {
    pub from: StationName,
    pub to: StationName,
    pub line: LineId,
    pub distance: f64,
}

/// Station/line routing graph.
///
/// Nodes live in an arena indexed by [`NodeId`]; edges refer to nodes by
/// index, and the name index maps each station name to its single node.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(super) nodes: Vec<Node>,
    pub(super) adjacency: Vec<Vec<Edge>>,
    pub(super) index: HashMap<StationName, NodeId>,
    pub(super) lines: BTreeMap<LineId, Line>,
}

impl Graph {
    /// Look up a station by exact, case-sensitive name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Returns the node for an id from this graph.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Outgoing edges of a node, in insertion order.
    pub fn edges(&self, id: NodeId) -> &[Edge] {
        &self.adjacency[id.0]
    }

    /// Look up a line record.
    pub fn line(&self, id: LineId) -> Option<&Line> {
        self.lines.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges (two per adjacent pair).
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Station names in sorted order.
    pub fn station_names(&self) -> BTreeSet<&StationName> {
        self.nodes.iter().map(|n| &n.name).collect()
    }

    /// Every directed edge by station name, sorted.
    ///
    /// Two graphs built from the same data have equal edge lists even if
    /// their nodes were numbered differently.
    pub fn edge_list(&self) -> Vec<EdgeView> {
        let mut edges: Vec<EdgeView> = self
            .nodes
            .iter()
            .zip(&self.adjacency)
            .flat_map(|(node, edges)| {
                edges.iter().map(|e| EdgeView {
                    from: node.name.clone(),
                    to: self.nodes[e.to.0].name.clone(),
                    line: e.line,
                    distance: e.distance,
                })
            })
            .collect();

        edges.sort_by(|a, b| {
            (&a.from, &a.to, a.line)
                .cmp(&(&b.from, &b.to, b.line))
                .then(a.distance.total_cmp(&b.distance))
        });
        edges
    }

    fn node_set(&self) -> BTreeMap<&StationName, (&BTreeSet<LineId>, bool)> {
        self.nodes
            .iter()
            .map(|n| (&n.name, (&n.lines, n.is_interchange)))
            .collect()
    }
}

/// Structural equality: same nodes and same edge sets, regardless of the
/// order things were inserted in.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.lines == other.lines
            && self.node_set() == other.node_set()
            && self.edge_list() == other.edge_list()
    }
}
