//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Line, LineId, StationEntry};
use crate::metro::NetworkStatus;
use crate::network::LineStation;
use crate::planner::RouteResult;

/// Request to create or update a line.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    pub name: String,
    pub color: String,
}

/// A line.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LineResponse {
    pub id: LineId,
    pub name: String,
    pub color: String,
}

/// Request to add a station to a line.
#[derive(Debug, Deserialize)]
pub struct StationRequest {
    pub name: String,

    /// Sequence position on the line, starting at 1
    pub station_number_on_line: u32,

    /// Distance in km from the previous station on the line
    #[serde(default)]
    pub distance_from_previous_station: Option<f64>,

    #[serde(default)]
    pub is_interchange: bool,
}

/// A station's membership of a line.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StationResponse {
    pub line_id: LineId,

    /// Only filled in when listing stations across all lines
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line_name: Option<String>,

    pub name: String,
    pub station_number_on_line: u32,
    pub distance_from_previous_station: Option<f64>,
    pub is_interchange: bool,
}

/// Request to find a route.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub source: String,
    pub destination: String,
}

/// A change of line, with lines given by name.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LineChangeDetail {
    pub from: String,
    pub to: String,
    pub at: String,
}

/// A route with its fare and travel time.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    /// Station names from source to destination
    pub route: Vec<String>,

    pub total_stations: usize,

    /// Fare in ₹
    pub total_fare: f64,

    /// Stations where the line changes, in travel order
    pub interchanges: Vec<String>,

    pub interchange_count: usize,

    /// Human readable, e.g. "15 minutes"
    pub estimated_time: String,

    pub estimated_minutes: f64,

    /// Line id for each hop
    pub lines: Vec<LineId>,

    pub line_changes: Vec<LineChangeDetail>,

    pub distance_km: f64,
}

/// State of the routing graph.
#[derive(Debug, Serialize)]
pub struct NetworkStatusResponse {
    /// Whether a graph is serving route queries
    pub available: bool,

    pub generation: Option<u64>,

    /// RFC 3339 build time of the live graph
    pub built_at: Option<String>,
    pub stations: usize,
    pub edges: usize,
    pub lines: usize,

    /// Why the most recent rebuild was rejected, if it was
    pub last_error: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl From<Line> for LineResponse {
    fn from(line: Line) -> Self {
        Self {
            id: line.id,
            name: line.name,
            color: line.color,
        }
    }
}

impl StationResponse {
    pub fn from_entry(line_id: LineId, entry: StationEntry) -> Self {
        Self {
            line_id,
            line_name: None,
            name: entry.name.into(),
            station_number_on_line: entry.position,
            distance_from_previous_station: entry.distance_from_previous,
            is_interchange: entry.is_interchange,
        }
    }
}

impl From<LineStation> for StationResponse {
    fn from(ls: LineStation) -> Self {
        Self {
            line_name: Some(ls.line.name),
            ..Self::from_entry(ls.line.id, ls.station)
        }
    }
}

impl RouteResponse {
    /// Build a response, naming lines with `line_name`.
    pub fn from_route(route: &RouteResult, line_name: impl Fn(LineId) -> String) -> Self {
        let line_changes = route
            .line_changes
            .iter()
            .map(|change| LineChangeDetail {
                from: line_name(change.from),
                to: line_name(change.to),
                at: change.at.to_string(),
            })
            .collect();

        Self {
            route: route.stations.iter().map(ToString::to_string).collect(),
            total_stations: route.station_count(),
            total_fare: route.fare,
            interchanges: route
                .interchange_stations()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            interchange_count: route.interchange_count(),
            estimated_time: format_minutes(route.estimated_minutes),
            estimated_minutes: route.estimated_minutes,
            lines: route.lines.clone(),
            line_changes,
            distance_km: route.distance_km,
        }
    }
}

impl From<NetworkStatus> for NetworkStatusResponse {
    fn from(status: NetworkStatus) -> Self {
        Self {
            available: status.generation.is_some(),
            generation: status.generation,
            built_at: status.built_at.map(|t| t.to_rfc3339()),
            stations: status.stations,
            edges: status.edges,
            lines: status.lines,
            last_error: status.last_error.map(|e| e.to_string()),
        }
    }
}

/// Format a travel time, e.g. "15 minutes" or "12.5 minutes".
fn format_minutes(minutes: f64) -> String {
    let rounded = (minutes * 100.0).round() / 100.0;
    format!("{rounded} minutes")
}
