//! In-memory store of lines and their station memberships.

use std::collections::BTreeMap;

use crate::domain::{Line, LineId, StationEntry, StationName};

use super::error::StoreError;
use super::snapshot::{LineSnapshot, NetworkSnapshot};

/// A station membership together with the line it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStation {
    pub line: Line,
    pub station: StationEntry,
}

#[derive(Debug, Clone)]
struct LineRecord {
    line: Line,
    stations: Vec<StationEntry>,
}

impl LineRecord {
    /// Stations ordered by position.
    fn ordered_stations(&self) -> Vec<StationEntry> {
        let mut stations = self.stations.clone();
        stations.sort_by_key(|s| s.position);
        stations
    }

    /// Check a membership against this line and append it.
    fn insert(&mut self, entry: StationEntry) -> Result<(), StoreError> {
        if entry.position == 0 {
            return Err(StoreError::InvalidInput(
                "station number must start from 1".to_string(),
            ));
        }
        if let Some(km) = entry.distance_from_previous
            && !(km.is_finite() && km >= 0.0)
        {
            return Err(StoreError::InvalidInput(
                "distance from previous station must be a non-negative number".to_string(),
            ));
        }

        if self.stations.iter().any(|s| s.name == entry.name) {
            return Err(StoreError::DuplicateStationName {
                line: self.line.name.clone(),
                station: entry.name,
            });
        }
        if self.stations.iter().any(|s| s.position == entry.position) {
            return Err(StoreError::PositionTaken {
                line: self.line.name.clone(),
                position: entry.position,
            });
        }

        self.stations.push(entry);
        Ok(())
    }
}

/// Lines and stations, keyed by line id.
///
/// The store enforces per-line uniqueness of station names and positions
/// for everything added through it. Whether a line's positions form a
/// complete sequence is checked by the graph builder, since a line may be
/// incomplete while it is being assembled.
#[derive(Debug, Clone, Default)]
pub struct NetworkStore {
    lines: BTreeMap<LineId, LineRecord>,
}

impl NetworkStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the lines of a snapshot.
    ///
    /// Line ids and names must be unique, and every station must pass the
    /// same checks as [`NetworkStore::add_station`].
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Self, StoreError> {
        let mut store = Self::new();

        for line in snapshot.lines {
            if store.lines.contains_key(&line.id) {
                return Err(StoreError::DuplicateLineId(line.id));
            }
            store.check_name_free(&line.name, None)?;

            let mut record = LineRecord {
                line: line.line(),
                stations: Vec::with_capacity(line.stations.len()),
            };
            for entry in line.stations {
                record.insert(entry)?;
            }
            store.lines.insert(line.id, record);
        }

        Ok(store)
    }

    /// Returns the snapshot the graph is built from.
    ///
    /// Lines come out in id order with stations in position order. Lines
    /// without stations are left out.
    pub fn snapshot(&self) -> NetworkSnapshot {
        let lines = self
            .lines
            .values()
            .filter(|record| !record.stations.is_empty())
            .map(|record| LineSnapshot {
                id: record.line.id,
                name: record.line.name.clone(),
                color: record.line.color.clone(),
                stations: record.ordered_stations(),
            })
            .collect();

        NetworkSnapshot { lines }
    }

    /// All lines, in id order.
    pub fn list_lines(&self) -> Vec<Line> {
        self.lines.values().map(|r| r.line.clone()).collect()
    }

    /// Look up a line by id.
    pub fn get_line(&self, id: LineId) -> Result<Line, StoreError> {
        self.record(id).map(|r| r.line.clone())
    }

    /// Create a line with the next free id.
    pub fn create_line(&mut self, name: &str, color: &str) -> Result<Line, StoreError> {
        validate_line_fields(name, color)?;
        self.check_name_free(name, None)?;

        let id = self.next_id()?;
        let line = Line::new(id, name, color);
        self.lines.insert(
            id,
            LineRecord {
                line: line.clone(),
                stations: Vec::new(),
            },
        );

        Ok(line)
    }

    /// Rename or recolour a line.
    pub fn update_line(&mut self, id: LineId, name: &str, color: &str) -> Result<Line, StoreError> {
        validate_line_fields(name, color)?;
        self.record(id)?;
        self.check_name_free(name, Some(id))?;

        let record = self.record_mut(id)?;
        record.line.name = name.to_string();
        record.line.color = color.to_string();

        Ok(record.line.clone())
    }

    /// Delete a line. The line must have no stations.
    pub fn delete_line(&mut self, id: LineId) -> Result<Line, StoreError> {
        let count = self.record(id)?.stations.len();
        if count > 0 {
            return Err(StoreError::LineHasStations { id, count });
        }

        self.lines
            .remove(&id)
            .map(|r| r.line)
            .ok_or(StoreError::LineNotFound(id))
    }

    /// Add a station membership to a line.
    pub fn add_station(
        &mut self,
        line_id: LineId,
        entry: StationEntry,
    ) -> Result<StationEntry, StoreError> {
        self.record_mut(line_id)?.insert(entry.clone())?;
        Ok(entry)
    }

    /// Remove a station membership from a line.
    pub fn remove_station(
        &mut self,
        line_id: LineId,
        name: &StationName,
    ) -> Result<StationEntry, StoreError> {
        let record = self.record_mut(line_id)?;
        let idx = record
            .stations
            .iter()
            .position(|s| &s.name == name)
            .ok_or_else(|| StoreError::StationNotOnLine {
                line: line_id,
                station: name.clone(),
            })?;

        Ok(record.stations.remove(idx))
    }

    /// Stations of one line, in position order.
    pub fn line_stations(&self, id: LineId) -> Result<Vec<StationEntry>, StoreError> {
        self.record(id).map(LineRecord::ordered_stations)
    }

    /// Every station membership on every line.
    pub fn all_stations(&self) -> Vec<LineStation> {
        self.lines
            .values()
            .flat_map(|record| {
                record.ordered_stations().into_iter().map(|station| LineStation {
                    line: record.line.clone(),
                    station,
                })
            })
            .collect()
    }

    fn record(&self, id: LineId) -> Result<&LineRecord, StoreError> {
        self.lines.get(&id).ok_or(StoreError::LineNotFound(id))
    }

    fn record_mut(&mut self, id: LineId) -> Result<&mut LineRecord, StoreError> {
        self.lines.get_mut(&id).ok_or(StoreError::LineNotFound(id))
    }

    fn check_name_free(&self, name: &str, except: Option<LineId>) -> Result<(), StoreError> {
        let taken = self
            .lines
            .values()
            .any(|r| r.line.name == name && Some(r.line.id) != except);
        if taken {
            return Err(StoreError::DuplicateLineName(name.to_string()));
        }
        Ok(())
    }

    fn next_id(&self) -> Result<LineId, StoreError> {
        match self.lines.keys().next_back() {
            None => Ok(LineId(1)),
            Some(last) => last
                .0
                .checked_add(1)
                .map(LineId)
                .ok_or(StoreError::LineIdsExhausted),
        }
    }
}

fn validate_line_fields(name: &str, color: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidInput("line name must not be blank".to_string()));
    }
    if color.trim().is_empty() {
        return Err(StoreError::InvalidInput("line color must not be blank".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> StationName {
        StationName::parse(s).unwrap()
    }

    fn store_with_red() -> (NetworkStore, LineId) {
        let mut store = NetworkStore::new();
        let red = store.create_line("Red", "#e53935").unwrap();
        (store, red.id)
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let mut store = NetworkStore::new();
        let red = store.create_line("Red", "red").unwrap();
        let blue = store.create_line("Blue", "blue").unwrap();
        assert_eq!(red.id, LineId(1));
        assert_eq!(blue.id, LineId(2));
        assert_eq!(store.list_lines(), vec![red, blue]);
    }

    #[test]
    fn create_rejects_duplicate_name() {
        let (mut store, _) = store_with_red();
        let err = store.create_line("Red", "crimson").unwrap_err();
        assert_eq!(err, StoreError::DuplicateLineName("Red".into()));
    }

    #[test]
    fn create_rejects_blank_fields() {
        let mut store = NetworkStore::new();
        assert!(matches!(
            store.create_line(" ", "red"),
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            store.create_line("Red", ""),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn update_line_allows_keeping_own_name() {
        let (mut store, red) = store_with_red();
        let updated = store.update_line(red, "Red", "#ff0000").unwrap();
        assert_eq!(updated.color, "#ff0000");
    }

    #[test]
    fn update_line_rejects_other_lines_name() {
        let (mut store, red) = store_with_red();
        store.create_line("Blue", "blue").unwrap();
        let err = store.update_line(red, "Blue", "red").unwrap_err();
        assert_eq!(err, StoreError::DuplicateLineName("Blue".into()));
    }

    #[test]
    fn update_unknown_line() {
        let mut store = NetworkStore::new();
        let err = store.update_line(LineId(9), "Red", "red").unwrap_err();
        assert_eq!(err, StoreError::LineNotFound(LineId(9)));
    }

    #[test]
    fn delete_requires_empty_line() {
        let (mut store, red) = store_with_red();
        store
            .add_station(red, StationEntry::new(name("Miyapur"), 1))
            .unwrap();

        let err = store.delete_line(red).unwrap_err();
        assert_eq!(err, StoreError::LineHasStations { id: red, count: 1 });

        store.remove_station(red, &name("Miyapur")).unwrap();
        store.delete_line(red).unwrap();
        assert!(store.list_lines().is_empty());
    }

    #[test]
    fn add_station_rejects_duplicates_on_same_line() {
        let (mut store, red) = store_with_red();
        store
            .add_station(red, StationEntry::new(name("Miyapur"), 1))
            .unwrap();

        let err = store
            .add_station(red, StationEntry::new(name("Miyapur"), 2))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateStationName { .. }));

        let err = store
            .add_station(red, StationEntry::new(name("Kukatpally"), 1))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::PositionTaken {
                line: "Red".into(),
                position: 1
            }
        );
    }

    #[test]
    fn same_station_on_two_lines_is_allowed() {
        let (mut store, red) = store_with_red();
        let blue = store.create_line("Blue", "blue").unwrap().id;
        store
            .add_station(red, StationEntry::new(name("Ameerpet"), 1))
            .unwrap();
        store
            .add_station(blue, StationEntry::new(name("Ameerpet"), 1))
            .unwrap();
        assert_eq!(store.all_stations().len(), 2);
    }

    #[test]
    fn add_station_validates_fields() {
        let (mut store, red) = store_with_red();
        assert!(matches!(
            store.add_station(red, StationEntry::new(name("Miyapur"), 0)),
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            store.add_station(red, StationEntry::new(name("Miyapur"), 1).with_distance(-1.0)),
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            store.add_station(LineId(42), StationEntry::new(name("Miyapur"), 1)),
            Err(StoreError::LineNotFound(LineId(42)))
        ));
    }

    #[test]
    fn remove_unknown_station() {
        let (mut store, red) = store_with_red();
        let err = store.remove_station(red, &name("Nowhere")).unwrap_err();
        assert!(matches!(err, StoreError::StationNotOnLine { .. }));
    }

    #[test]
    fn stations_come_back_in_position_order() {
        let (mut store, red) = store_with_red();
        store
            .add_station(red, StationEntry::new(name("C"), 3))
            .unwrap();
        store
            .add_station(red, StationEntry::new(name("A"), 1))
            .unwrap();
        store
            .add_station(red, StationEntry::new(name("B"), 2))
            .unwrap();

        let names: Vec<_> = store
            .line_stations(red)
            .unwrap()
            .into_iter()
            .map(|s| s.name.to_string())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn snapshot_omits_empty_lines() {
        let (mut store, red) = store_with_red();
        store.create_line("Blue", "blue").unwrap();
        store
            .add_station(red, StationEntry::new(name("A"), 1))
            .unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.lines[0].id, red);
    }

    #[test]
    fn from_snapshot_rejects_duplicate_ids_and_names() {
        let line = |id, n: &str| LineSnapshot {
            id: LineId(id),
            name: n.to_string(),
            color: "c".to_string(),
            stations: Vec::new(),
        };

        let err = NetworkStore::from_snapshot(NetworkSnapshot {
            lines: vec![line(1, "Red"), line(1, "Blue")],
        })
        .unwrap_err();
        assert_eq!(err, StoreError::DuplicateLineId(LineId(1)));

        let err = NetworkStore::from_snapshot(NetworkSnapshot {
            lines: vec![line(1, "Red"), line(2, "Red")],
        })
        .unwrap_err();
        assert_eq!(err, StoreError::DuplicateLineName("Red".into()));
    }

    #[test]
    fn from_snapshot_then_create_uses_next_id() {
        let store = NetworkStore::from_snapshot(NetworkSnapshot {
            lines: vec![LineSnapshot {
                id: LineId(5),
                name: "Green".into(),
                color: "green".into(),
                stations: Vec::new(),
            }],
        });
        let mut store = store.unwrap();
        let line = store.create_line("Red", "red").unwrap();
        assert_eq!(line.id, LineId(6));
    }

    fn snapshot_line(id: u32, stations: Vec<StationEntry>) -> NetworkSnapshot {
        NetworkSnapshot {
            lines: vec![LineSnapshot {
                id: LineId(id),
                name: "Green".into(),
                color: "green".into(),
                stations,
            }],
        }
    }

    #[test]
    fn create_after_highest_possible_id_fails() {
        let mut store = NetworkStore::from_snapshot(snapshot_line(u32::MAX, Vec::new())).unwrap();

        let err = store.create_line("Next", "blue").unwrap_err();
        assert_eq!(err, StoreError::LineIdsExhausted);
        assert_eq!(store.list_lines().len(), 1);
    }

    #[test]
    fn from_snapshot_checks_stations() {
        let err = NetworkStore::from_snapshot(snapshot_line(
            1,
            vec![
                StationEntry::new(name("A"), 1),
                StationEntry::new(name("B"), 2).with_distance(-1.0),
            ],
        ))
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));

        let err = NetworkStore::from_snapshot(snapshot_line(
            1,
            vec![
                StationEntry::new(name("A"), 1),
                StationEntry::new(name("B"), 2).with_distance(f64::NAN),
            ],
        ))
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));

        let err = NetworkStore::from_snapshot(snapshot_line(
            1,
            vec![
                StationEntry::new(name("A"), 1),
                StationEntry::new(name("A"), 2),
            ],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateStationName {
                line: "Green".into(),
                station: name("A"),
            }
        );

        let err = NetworkStore::from_snapshot(snapshot_line(
            1,
            vec![
                StationEntry::new(name("A"), 1),
                StationEntry::new(name("B"), 1),
            ],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            StoreError::PositionTaken {
                line: "Green".into(),
                position: 1,
            }
        );
    }
}
