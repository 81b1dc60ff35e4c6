//! Route search over (station, line) states.
//!
//! A plain shortest-path search over stations cannot tell apart two routes
//! of equal length that differ only in how many times they change line.
//! Searching over (station, current line) pairs makes the cost of reaching
//! a state depend on whether the last hop changed line, so the search can
//! minimise stations first and line changes second.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::{debug, trace};

use crate::domain::{LineId, StationName};
use crate::graph::{Graph, NodeId};

use super::config::Tariff;
use super::fare::quote;

/// Error from route search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// No station with this exact name is in the graph
    #[error("station '{0}' not found")]
    StationNotFound(String),

    /// Both stations exist but nothing connects them
    #[error("no route found between '{from}' and '{to}'")]
    NoRoute { from: String, to: String },
}

/// A change of line part-way through a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    pub from: LineId,
    pub to: LineId,
    pub at: StationName,
}

/// A complete route with its fare and estimated time.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Stations from source to destination, both included.
    pub stations: Vec<StationName>,

    /// Line used for each hop; one shorter than `stations`.
    pub lines: Vec<LineId>,

    /// Every point where consecutive hops are on different lines.
    pub line_changes: Vec<LineChange>,

    /// Sum of edge distances along the route (km).
    pub distance_km: f64,

    /// Total fare (₹).
    pub fare: f64,

    /// Estimated travel time (minutes).
    pub estimated_minutes: f64,
}

impl RouteResult {
    /// Number of stations, counting both ends.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Number of line changes.
    pub fn interchange_count(&self) -> usize {
        self.line_changes.len()
    }

    /// Stations where the line changes, in travel order.
    pub fn interchange_stations(&self) -> Vec<&StationName> {
        self.line_changes.iter().map(|c| &c.at).collect()
    }

    /// Build the result for a fixed path and price it.
    fn priced(
        stations: Vec<StationName>,
        lines: Vec<LineId>,
        distance_km: f64,
        tariff: &Tariff,
    ) -> Self {
        let line_changes: Vec<LineChange> = lines
            .windows(2)
            .zip(&stations[1..])
            .filter(|(pair, _)| pair[0] != pair[1])
            .map(|(pair, at)| LineChange {
                from: pair[0],
                to: pair[1],
                at: at.clone(),
            })
            .collect();

        let q = quote(tariff, stations.len(), line_changes.len());

        Self {
            stations,
            lines,
            line_changes,
            distance_km,
            fare: q.fare,
            estimated_minutes: q.minutes,
        }
    }
}

/// Search state: a station and the line the passenger arrived on.
///
/// The source state has no line, so its first hop is never a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct State {
    node: NodeId,
    line: Option<LineId>,
}

/// Accumulated cost. Compared hops first, then changes, which is the
/// same as pricing a change at `1 + ε` hops for an infinitesimal `ε`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Cost {
    hops: usize,
    changes: usize,
}

/// Frontier entry.
///
/// `seq` is the push order. Equal-cost entries pop first-in first-out, so
/// the result only depends on the graph's edge order.
#[derive(Debug, PartialEq, Eq)]
struct Frontier {
    cost: Cost,
    seq: u64,
    state: State,
}

// BinaryHeap is a max-heap; flip the ordering to pop the cheapest first.
impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// How a state was first reached with its best cost.
#[derive(Debug, Clone, Copy)]
struct Predecessor {
    state: State,
    distance: f64,
}

/// Route planner over a built graph.
#[derive(Debug)]
pub struct Planner<'a> {
    graph: &'a Graph,
    tariff: &'a Tariff,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(graph: &'a Graph, tariff: &'a Tariff) -> Self {
        Self { graph, tariff }
    }

    /// Find the route with the fewest stations, and among those the fewest
    /// line changes, between two stations named exactly.
    ///
    /// Searching from a station to itself gives a one-station route.
    pub fn find_route(&self, source: &str, destination: &str) -> Result<RouteResult, RouteError> {
        let from = self
            .graph
            .node_id(source)
            .ok_or_else(|| RouteError::StationNotFound(source.to_string()))?;
        let to = self
            .graph
            .node_id(destination)
            .ok_or_else(|| RouteError::StationNotFound(destination.to_string()))?;

        if from == to {
            let station = self.graph.node(from).name.clone();
            return Ok(RouteResult::priced(vec![station], Vec::new(), 0.0, self.tariff));
        }

        let start = State {
            node: from,
            line: None,
        };

        let mut best: HashMap<State, Cost> = HashMap::new();
        let mut predecessors: HashMap<State, Predecessor> = HashMap::new();
        let mut settled: HashSet<State> = HashSet::new();
        let mut frontier = BinaryHeap::new();
        let mut seq = 0u64;

        let zero = Cost {
            hops: 0,
            changes: 0,
        };
        best.insert(start, zero);
        frontier.push(Frontier {
            cost: zero,
            seq,
            state: start,
        });

        while let Some(Frontier { cost, state, .. }) = frontier.pop() {
            if !settled.insert(state) {
                continue;
            }

            if state.node == to {
                debug!(
                    source,
                    destination,
                    hops = cost.hops,
                    changes = cost.changes,
                    states_explored = settled.len(),
                    "route found"
                );
                return Ok(self.reconstruct(start, state, &predecessors));
            }

            for edge in self.graph.edges(state.node) {
                let next = State {
                    node: edge.to,
                    line: Some(edge.line),
                };
                if settled.contains(&next) {
                    continue;
                }

                let changed = state.line.is_some_and(|line| line != edge.line);
                let next_cost = Cost {
                    hops: cost.hops + 1,
                    changes: cost.changes + usize::from(changed),
                };

                if best.get(&next).is_none_or(|known| next_cost < *known) {
                    trace!(?next, ?next_cost, "relaxed");
                    best.insert(next, next_cost);
                    predecessors.insert(
                        next,
                        Predecessor {
                            state,
                            distance: edge.distance,
                        },
                    );
                    seq += 1;
                    frontier.push(Frontier {
                        cost: next_cost,
                        seq,
                        state: next,
                    });
                }
            }
        }

        debug!(
            source,
            destination,
            states_explored = settled.len(),
            "no route"
        );
        Err(RouteError::NoRoute {
            from: source.to_string(),
            to: destination.to_string(),
        })
    }

    /// Walk predecessor links back from the destination state.
    fn reconstruct(
        &self,
        start: State,
        end: State,
        predecessors: &HashMap<State, Predecessor>,
    ) -> RouteResult {
        let mut states = vec![end];
        let mut distance_km = 0.0;
        let mut current = end;

        while current != start {
            let Some(prev) = predecessors.get(&current) else {
                break;
            };
            distance_km += prev.distance;
            current = prev.state;
            states.push(current);
        }
        states.reverse();

        let stations = states
            .iter()
            .map(|s| self.graph.node(s.node).name.clone())
            .collect();
        let lines = states.iter().filter_map(|s| s.line).collect();

        RouteResult::priced(stations, lines, distance_km, self.tariff)
    }
}
