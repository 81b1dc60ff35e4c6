//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::domain::{LineId, StationEntry, StationName};

use super::dto::*;
use super::error::AppError;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/network", get(network_status))
        .route("/api/lines", get(list_lines).post(create_line))
        .route(
            "/api/lines/:id",
            get(get_line).put(update_line).delete(delete_line),
        )
        .route(
            "/api/lines/:id/stations",
            get(list_line_stations).post(add_station),
        )
        .route("/api/lines/:id/stations/:name", delete(remove_station))
        .route("/api/stations", get(list_stations))
        .route("/api/route/find", post(find_route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body, logging it on failure.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, body = %String::from_utf8_lossy(body), "invalid JSON body");
        AppError::bad_request(format!("Invalid JSON: {e}"))
    })
}

fn parse_station_name(name: &str) -> Result<StationName, AppError> {
    StationName::parse(name).map_err(|e| AppError::bad_request(e.to_string()))
}

/// State of the routing graph.
async fn network_status(State(state): State<AppState>) -> Json<NetworkStatusResponse> {
    Json(state.metro.status().await.into())
}

async fn list_lines(State(state): State<AppState>) -> Json<Vec<LineResponse>> {
    let lines = state.metro.list_lines().await;
    Json(lines.into_iter().map(LineResponse::from).collect())
}

async fn create_line(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let req: LineRequest = parse_body(&body)?;
    let line = state.metro.create_line(&req.name, &req.color).await?;
    Ok((StatusCode::CREATED, Json(LineResponse::from(line))))
}

async fn get_line(
    State(state): State<AppState>,
    id: Result<Path<LineId>, PathRejection>,
) -> Result<Json<LineResponse>, AppError> {
    let Path(id) = id?;
    let line = state.metro.get_line(id).await?;
    Ok(Json(line.into()))
}

async fn update_line(
    State(state): State<AppState>,
    id: Result<Path<LineId>, PathRejection>,
    body: Bytes,
) -> Result<Json<LineResponse>, AppError> {
    let Path(id) = id?;
    let req: LineRequest = parse_body(&body)?;
    let line = state.metro.update_line(id, &req.name, &req.color).await?;
    Ok(Json(line.into()))
}

async fn delete_line(
    State(state): State<AppState>,
    id: Result<Path<LineId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    state.metro.delete_line(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a station to a line and rebuild the graph.
async fn add_station(
    State(state): State<AppState>,
    id: Result<Path<LineId>, PathRejection>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let req: StationRequest = parse_body(&body)?;
    let entry = StationEntry {
        name: parse_station_name(&req.name)?,
        position: req.station_number_on_line,
        distance_from_previous: req.distance_from_previous_station,
        is_interchange: req.is_interchange,
    };

    let added = state.metro.add_station(id, entry).await?;
    Ok((
        StatusCode::CREATED,
        Json(StationResponse::from_entry(id, added)),
    ))
}

async fn list_line_stations(
    State(state): State<AppState>,
    id: Result<Path<LineId>, PathRejection>,
) -> Result<Json<Vec<StationResponse>>, AppError> {
    let Path(id) = id?;
    let stations = state.metro.line_stations(id).await?;
    Ok(Json(
        stations
            .into_iter()
            .map(|s| StationResponse::from_entry(id, s))
            .collect(),
    ))
}

async fn remove_station(
    State(state): State<AppState>,
    path: Result<Path<(LineId, String)>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path((id, name)) = path?;
    let name = parse_station_name(&name)?;
    state.metro.remove_station(id, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Every station membership across all lines.
async fn list_stations(State(state): State<AppState>) -> Json<Vec<StationResponse>> {
    let stations = state.metro.all_stations().await;
    Json(stations.into_iter().map(StationResponse::from).collect())
}

/// Find the route with the fewest stations, then the fewest line changes.
async fn find_route(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RouteResponse>, AppError> {
    let req: RouteRequest = parse_body(&body)?;
    let route = state.metro.find_route(&req.source, &req.destination).await?;

    let published = state.metro.graph();
    let line_name = |id: LineId| {
        published
            .as_ref()
            .and_then(|p| p.graph.line(id))
            .map_or_else(|| id.to_string(), |line| line.name.clone())
    };

    Ok(Json(RouteResponse::from_route(&route, line_name)))
}
