//! The metro service: network data, the live routing graph, and route
//! queries against it.
//!
//! Queries read the current graph without taking any lock. Every change to
//! the network builds a complete new graph off to the side and publishes
//! it with a single pointer swap, so a query sees either the old graph or
//! the new one in full. If a rebuild fails the previous graph stays live.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheConfig, RouteCache};
use crate::domain::{Line, LineId, StationEntry, StationName};
use crate::graph::{self, Graph, MalformedNetworkError};
use crate::network::{LineStation, NetworkStore, SnapshotError, SnapshotSource, StoreError};
use crate::planner::{Planner, RouteError, RouteResult, Tariff};

/// Errors from the metro service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The network data could not be built into a graph
    #[error("malformed network data: {0}")]
    Malformed(#[from] MalformedNetworkError),

    /// No graph has been published yet
    #[error("routing graph is not available")]
    Unavailable,
}

/// A graph that has been published for queries.
#[derive(Debug)]
pub struct PublishedGraph {
    pub graph: Graph,

    /// Increments with every successful rebuild
    pub generation: u64,

    pub built_at: DateTime<Utc>,
}

/// Summary of the live graph and the last rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkStatus {
    pub generation: Option<u64>,
    pub built_at: Option<DateTime<Utc>>,
    pub stations: usize,
    pub edges: usize,
    pub lines: usize,

    /// Why the most recent rebuild was rejected, if it was
    pub last_error: Option<MalformedNetworkError>,
}

#[derive(Debug)]
struct Inner {
    store: NetworkStore,
    generation: u64,
    last_error: Option<MalformedNetworkError>,
}

/// Shared metro service.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct MetroService {
    inner: RwLock<Inner>,
    current: ArcSwapOption<PublishedGraph>,
    cache: RouteCache,
    tariff: Tariff,
}

impl MetroService {
    /// Create a service over a store and publish its first graph.
    ///
    /// If the store's data is malformed the service starts without a graph;
    /// route queries fail with [`ServiceError::Unavailable`] until a change
    /// to the network makes it well formed.
    pub fn new(store: NetworkStore, tariff: Tariff, cache: &CacheConfig) -> Self {
        let current = ArcSwapOption::empty();
        let cache = RouteCache::new(cache);
        let mut inner = Inner {
            store,
            generation: 0,
            last_error: None,
        };

        if let Err(e) = inner.rebuild(&current, &cache) {
            warn!(error = %e, "starting without a routing graph");
        }

        Self {
            inner: RwLock::new(inner),
            current,
            cache,
            tariff,
        }
    }

    /// Create a service from a snapshot source.
    pub fn load(
        source: &impl SnapshotSource,
        tariff: Tariff,
        cache: &CacheConfig,
    ) -> Result<Self, ServiceError> {
        let snapshot = source.read_snapshot()?;
        let store = NetworkStore::from_snapshot(snapshot)?;
        Ok(Self::new(store, tariff, cache))
    }

    /// The graph currently serving queries.
    pub fn graph(&self) -> Option<Arc<PublishedGraph>> {
        self.current.load_full()
    }

    /// Find a route between two stations on the live graph.
    pub async fn find_route(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<Arc<RouteResult>, ServiceError> {
        let published = self.graph().ok_or(ServiceError::Unavailable)?;

        if let Some(hit) = self
            .cache
            .get(published.generation, source, destination)
            .await
        {
            debug!(source, destination, "route cache hit");
            return Ok(hit);
        }

        let route = Planner::new(&published.graph, &self.tariff)
            .find_route(source, destination)
            .map(Arc::new)?;
        self.cache
            .insert(published.generation, source, destination, route.clone())
            .await;

        Ok(route)
    }

    /// Rebuild the graph from the current network data.
    ///
    /// Returns the new generation, or the reason the data was rejected.
    pub async fn rebuild(&self) -> Result<u64, ServiceError> {
        let mut inner = self.inner.write().await;
        Ok(inner.rebuild(&self.current, &self.cache)?)
    }

    /// Live graph summary and the outcome of the last rebuild.
    pub async fn status(&self) -> NetworkStatus {
        let last_error = self.inner.read().await.last_error.clone();
        let published = self.graph();

        NetworkStatus {
            generation: published.as_ref().map(|p| p.generation),
            built_at: published.as_ref().map(|p| p.built_at),
            stations: published.as_ref().map_or(0, |p| p.graph.node_count()),
            edges: published.as_ref().map_or(0, |p| p.graph.edge_count()),
            lines: published.as_ref().map_or(0, |p| p.graph.line_count()),
            last_error,
        }
    }

    pub async fn list_lines(&self) -> Vec<Line> {
        self.inner.read().await.store.list_lines()
    }

    pub async fn get_line(&self, id: LineId) -> Result<Line, ServiceError> {
        Ok(self.inner.read().await.store.get_line(id)?)
    }

    pub async fn line_stations(&self, id: LineId) -> Result<Vec<StationEntry>, ServiceError> {
        Ok(self.inner.read().await.store.line_stations(id)?)
    }

    pub async fn all_stations(&self) -> Vec<LineStation> {
        self.inner.read().await.store.all_stations()
    }

    pub async fn create_line(&self, name: &str, color: &str) -> Result<Line, ServiceError> {
        self.mutate(|store| store.create_line(name, color)).await
    }

    pub async fn update_line(
        &self,
        id: LineId,
        name: &str,
        color: &str,
    ) -> Result<Line, ServiceError> {
        self.mutate(|store| store.update_line(id, name, color)).await
    }

    pub async fn delete_line(&self, id: LineId) -> Result<Line, ServiceError> {
        self.mutate(|store| store.delete_line(id)).await
    }

    pub async fn add_station(
        &self,
        line: LineId,
        entry: StationEntry,
    ) -> Result<StationEntry, ServiceError> {
        self.mutate(|store| store.add_station(line, entry)).await
    }

    pub async fn remove_station(
        &self,
        line: LineId,
        name: &StationName,
    ) -> Result<StationEntry, ServiceError> {
        self.mutate(|store| store.remove_station(line, name)).await
    }

    /// Apply a change to the store and rebuild.
    ///
    /// The store lock is held across the rebuild so graphs are published in
    /// the same order as the changes they reflect. A failed rebuild does not
    /// undo the change.
    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut NetworkStore) -> Result<T, StoreError>,
    ) -> Result<T, ServiceError> {
        let mut inner = self.inner.write().await;
        let value = op(&mut inner.store)?;

        if let Err(e) = inner.rebuild(&self.current, &self.cache) {
            warn!(error = %e, "graph rebuild rejected; previous graph stays live");
        }

        Ok(value)
    }
}

impl Inner {
    /// Build a graph from the store and publish it.
    fn rebuild(
        &mut self,
        current: &ArcSwapOption<PublishedGraph>,
        cache: &RouteCache,
    ) -> Result<u64, MalformedNetworkError> {
        let snapshot = self.store.snapshot();

        let graph = match graph::build(&snapshot.lines) {
            Ok(graph) => graph,
            Err(e) => {
                self.last_error = Some(e.clone());
                return Err(e);
            }
        };

        self.generation += 1;
        self.last_error = None;

        info!(
            generation = self.generation,
            stations = graph.node_count(),
            edges = graph.edge_count(),
            lines = graph.line_count(),
            "published routing graph"
        );

        current.store(Some(Arc::new(PublishedGraph {
            graph,
            generation: self.generation,
            built_at: Utc::now(),
        })));
        cache.invalidate_all();

        Ok(self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{LineSnapshot, NetworkSnapshot};

    fn entry(name: &str, position: u32) -> StationEntry {
        StationEntry::new(StationName::parse(name).unwrap(), position).with_distance(1.0)
    }

    fn line(id: u32, name: &str, stations: &[&str]) -> LineSnapshot {
        LineSnapshot {
            id: LineId(id),
            name: name.to_string(),
            color: name.to_lowercase(),
            stations: stations
                .iter()
                .zip(1u32..)
                .map(|(n, pos)| entry(n, pos))
                .collect(),
        }
    }

    fn red_blue() -> NetworkSnapshot {
        NetworkSnapshot {
            lines: vec![
                line(1, "Red", &["A", "B", "C"]),
                line(2, "Blue", &["C", "D", "E"]),
            ],
        }
    }

    fn service(snapshot: &NetworkSnapshot) -> MetroService {
        MetroService::load(snapshot, Tariff::default(), &CacheConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn load_publishes_first_generation() {
        let service = service(&red_blue());
        let published = service.graph().unwrap();
        assert_eq!(published.generation, 1);
        assert_eq!(published.graph.node_count(), 5);

        let status = service.status().await;
        assert_eq!(status.generation, Some(1));
        assert_eq!(status.stations, 5);
        assert_eq!(status.edges, 8);
        assert_eq!(status.lines, 2);
        assert_eq!(status.last_error, None);
    }

    #[tokio::test]
    async fn find_route_on_live_graph() {
        let service = service(&red_blue());
        let route = service.find_route("A", "E").await.unwrap();
        assert_eq!(route.station_count(), 5);
        assert_eq!(route.fare, 27.0);
    }

    #[tokio::test]
    async fn find_route_errors_are_distinct() {
        let service = service(&red_blue());
        assert!(matches!(
            service.find_route("A", "Z").await,
            Err(ServiceError::Route(RouteError::StationNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn repeated_query_is_served_from_cache() {
        let service = service(&red_blue());
        let first = service.find_route("A", "E").await.unwrap();
        let second = service.find_route("A", "E").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn mutation_publishes_new_graph() {
        let service = service(&red_blue());
        let old = service.graph().unwrap();

        service
            .add_station(LineId(2), entry("F", 4))
            .await
            .unwrap();

        let new = service.graph().unwrap();
        assert_eq!(new.generation, 2);
        assert_eq!(new.graph.node_count(), 6);

        // A reader holding the old graph still sees it unchanged
        assert_eq!(old.generation, 1);
        assert_eq!(old.graph.node_count(), 5);

        let route = service.find_route("A", "F").await.unwrap();
        assert_eq!(route.station_count(), 6);
    }

    #[tokio::test]
    async fn cached_route_is_not_served_after_rebuild() {
        let service = service(&red_blue());
        let before = service.find_route("A", "E").await.unwrap();
        assert_eq!(before.station_count(), 5);

        // A new line makes A-E a single hop
        let green = service.create_line("Green", "green").await.unwrap();
        service.add_station(green.id, entry("A", 1)).await.unwrap();
        service.add_station(green.id, entry("E", 2)).await.unwrap();

        let after = service.find_route("A", "E").await.unwrap();
        assert_eq!(after.station_count(), 2);
    }

    #[tokio::test]
    async fn failed_rebuild_keeps_previous_graph() {
        let service = service(&red_blue());

        // An empty line is left out of the graph; a one-station line is malformed
        let green = service.create_line("Green", "green").await.unwrap();
        let generation = service.graph().unwrap().generation;
        service.add_station(green.id, entry("X", 1)).await.unwrap();

        let published = service.graph().unwrap();
        assert_eq!(published.generation, generation);
        assert_eq!(published.graph.node_count(), 5);

        let status = service.status().await;
        assert_eq!(
            status.last_error,
            Some(MalformedNetworkError::TooFewStations {
                line: green.id,
                count: 1
            })
        );

        // Queries keep working on the previous graph
        assert!(service.find_route("A", "E").await.is_ok());

        // Completing the line clears the error
        service.add_station(green.id, entry("Y", 2)).await.unwrap();
        let status = service.status().await;
        assert_eq!(status.generation, Some(generation + 1));
        assert_eq!(status.stations, 7);
        assert_eq!(status.last_error, None);
    }

    #[tokio::test]
    async fn explicit_rebuild_reports_malformed_data() {
        let service = service(&red_blue());
        let green = service.create_line("Green", "green").await.unwrap();
        service.add_station(green.id, entry("X", 2)).await.unwrap();
        service.add_station(green.id, entry("Y", 3)).await.unwrap();

        assert!(matches!(
            service.rebuild().await,
            Err(ServiceError::Malformed(
                MalformedNetworkError::NonSequentialPosition { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn malformed_start_has_no_graph() {
        let snapshot = NetworkSnapshot {
            lines: vec![line(1, "Red", &["A"])],
        };
        let service = service(&snapshot);

        assert!(service.graph().is_none());
        assert!(matches!(
            service.find_route("A", "A").await,
            Err(ServiceError::Unavailable)
        ));
        assert!(service.status().await.last_error.is_some());
    }

    #[tokio::test]
    async fn store_errors_do_not_rebuild() {
        let service = service(&red_blue());
        let err = service.create_line("Red", "red").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Store(StoreError::DuplicateLineName(_))
        ));
        assert_eq!(service.graph().unwrap().generation, 1);
    }

    #[tokio::test]
    async fn bundled_network_routes_through_ameerpet() {
        let path =
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../data/network.json");
        let service = MetroService::load(
            &crate::network::SnapshotFile::new(path),
            Tariff::default(),
            &CacheConfig::default(),
        )
        .unwrap();

        let status = service.status().await;
        assert_eq!(status.lines, 3);
        assert_eq!(status.last_error, None);

        let route = service.find_route("Miyapur", "Hitec City").await.unwrap();
        assert_eq!(route.station_count(), 19);
        assert_eq!(route.interchange_stations()[0].as_str(), "Ameerpet");
        assert_eq!(route.fare, 97.0);
        assert_eq!(route.estimated_minutes, 50.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn queries_see_whole_graphs_during_rebuilds() {
        let service = Arc::new(service(&red_blue()));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move {
                    for _ in 0..200 {
                        let published = service.graph().unwrap();
                        let graph = &published.graph;
                        // Every published graph is internally consistent
                        let edges = graph.edge_list();
                        for e in &edges {
                            assert!(graph.node_id(e.from.as_str()).is_some());
                            assert!(graph.node_id(e.to.as_str()).is_some());
                        }
                        assert_eq!(edges.len(), graph.edge_count());
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        let green = service.create_line("Green", "green").await.unwrap();
        for (pos, name) in (1u32..).zip(["E", "G1", "G2", "G3", "G4"]) {
            service.add_station(green.id, entry(name, pos)).await.unwrap();
        }

        for reader in readers {
            reader.await.unwrap();
        }
        assert_eq!(service.graph().unwrap().graph.node_count(), 9);
    }
}
