//! In-memory store of stops, buses and road distances.
//!
//! Stops and buses live in append-only arenas and are addressed by dense ids.
//! Every cross reference (bus walks, distance keys, the stop to bus index) is
//! an id, so nothing borrows into the arenas.

use std::collections::{BTreeSet, HashMap, HashSet};

use geo::Point;

use crate::identifiers::*;
use crate::models::{info::*, types::*};
use crate::spatial::{path_length, point_from_lat_lng};

#[derive(Clone, Debug, Default)]
pub struct TransportCatalogue {
    // Arenas
    stops: Vec<Stop>,
    buses: Vec<Bus>,

    // Lookup maps
    stop_index: HashMap<StopName, StopId>,
    bus_index: HashMap<BusName, BusId>,

    // Directed road distances in meters
    distances: HashMap<(StopId, StopId), u32>,

    // Buses serving each stop, indexed by stop id
    stop_buses: Vec<BTreeSet<BusName>>,
}

impl TransportCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a complete catalogue: every stop, then every distance, then every
    /// bus. The first construction error aborts the load.
    pub fn from_records(stops: &[StopRecord], buses: &[BusRecord]) -> Result<Self> {
        let mut catalogue = Self::new();
        catalogue.add_stops(stops)?;
        catalogue.add_buses(buses)?;
        log::info!(
            "Catalogue loaded: {} stops, {} buses, {} road distances",
            catalogue.stops.len(),
            catalogue.buses.len(),
            catalogue.distances.len()
        );
        Ok(catalogue)
    }

    // ---- Population ----

    pub fn add_stop(&mut self, name: &str, location: Point) -> Result<StopId> {
        if self.stop_index.contains_key(name) {
            return Err(TransitError::DuplicateStop(StopName::new(name)));
        }

        let id = StopId(self.next_id(self.stops.len())?);
        let name = StopName::new(name);
        self.stop_index.insert(name.clone(), id);
        self.stops.push(Stop { id, name, location });
        self.stop_buses.push(BTreeSet::new());
        Ok(id)
    }

    /// Adds all stops first, then their road distances, so a distance may
    /// point at a stop that appears later in `records`.
    ///
    /// A distance to a stop missing from `records` is skipped: `add_bus`
    /// rejects unknown stops, so no walk can ever need it.
    pub fn add_stops(&mut self, records: &[StopRecord]) -> Result<()> {
        for record in records {
            let location = point_from_lat_lng(record.latitude, record.longitude);
            self.add_stop(&record.name, location)?;
        }
        for record in records {
            for (other, &meters) in &record.road_distances {
                if !self.stop_index.contains_key(other.as_str()) {
                    log::warn!("Skipping road distance {} -> {}: unknown stop", record.name, other);
                    continue;
                }
                self.set_distance(&record.name, other, meters)?;
            }
        }
        Ok(())
    }

    /// Store (or overwrite) the road distance `from -> to`.
    pub fn set_distance(&mut self, from: &str, to: &str, meters: u32) -> Result<()> {
        let from = self.stop_id(from)?;
        let to = self.stop_id(to)?;
        self.distances.insert((from, to), meters);
        Ok(())
    }

    /// Add a bus line. `stops` is the outbound list; when `is_roundtrip` is
    /// false the way back is appended, so the stored walk is closed.
    ///
    /// Route statistics are computed here, so every distance the walk needs
    /// must already be set.
    pub fn add_bus<S: AsRef<str>>(
        &mut self,
        name: &str,
        stops: &[S],
        is_roundtrip: bool,
    ) -> Result<BusId> {
        if self.bus_index.contains_key(name) {
            return Err(TransitError::DuplicateBus(BusName::new(name)));
        }
        let bus_name = BusName::new(name);

        let mut walk = Vec::with_capacity(stops.len() * 2);
        for stop in stops {
            let stop = stop.as_ref();
            let id = self
                .stop_index
                .get(stop)
                .copied()
                .ok_or_else(|| TransitError::UnknownStopInBus {
                    bus: bus_name.clone(),
                    stop: StopName::new(stop),
                })?;
            walk.push(id);
        }
        if !is_roundtrip {
            let back: Vec<StopId> = walk.iter().rev().skip(1).copied().collect();
            walk.extend(back);
        }

        if walk.len() < 2 {
            return Err(TransitError::MalformedRoute {
                bus: bus_name,
                reason: format!("walk has {} stop(s), at least 2 are required", walk.len()),
            });
        }

        let unique: HashSet<StopId> = walk.iter().copied().collect();

        let mut route_length = 0u64;
        for pair in walk.windows(2) {
            let meters = self.distance_between(pair[0], pair[1]).ok_or_else(|| {
                TransitError::MissingDistance {
                    from: self.stops[pair[0].index()].name.clone(),
                    to: self.stops[pair[1].index()].name.clone(),
                }
            })?;
            route_length += u64::from(meters);
        }

        let geo_length = path_length(walk.iter().map(|id| self.stops[id.index()].location));

        let id = BusId(self.next_id(self.buses.len())?);
        for stop in &unique {
            self.stop_buses[stop.index()].insert(bus_name.clone());
        }
        self.bus_index.insert(bus_name.clone(), id);
        log::debug!(
            "Bus {}: {} stops ({} unique), {} m by road",
            bus_name,
            walk.len(),
            unique.len(),
            route_length
        );
        self.buses.push(Bus {
            id,
            name: bus_name,
            stops: walk,
            is_roundtrip,
            unique_stop_count: unique.len(),
            route_length,
            geo_length,
        });
        Ok(id)
    }

    pub fn add_buses(&mut self, records: &[BusRecord]) -> Result<()> {
        for record in records {
            self.add_bus(&record.name, record.stops.as_slice(), record.is_roundtrip)?;
        }
        Ok(())
    }

    // ---- Queries ----

    pub fn bus_info(&self, name: &str) -> Result<BusInfo> {
        let bus = self
            .bus(name)
            .ok_or_else(|| TransitError::BusNotFound(BusName::new(name)))?;
        Ok(BusInfo {
            name: bus.name.clone(),
            stop_count: bus.stops.len(),
            unique_stop_count: bus.unique_stop_count,
            route_length: bus.route_length,
            geo_length: bus.geo_length,
        })
    }

    pub fn stop_info(&self, name: &str) -> Result<StopInfo> {
        let stop = self
            .stop(name)
            .ok_or_else(|| TransitError::StopNotFound(StopName::new(name)))?;
        Ok(StopInfo {
            name: stop.name.clone(),
            buses: self.stop_buses[stop.id.index()].clone(),
        })
    }

    /// Road distance `from -> to`, falling back to `to -> from`.
    pub fn distance(&self, from: &str, to: &str) -> Result<u32> {
        let from_id = self.stop_id(from)?;
        let to_id = self.stop_id(to)?;
        self.distance_between(from_id, to_id)
            .ok_or_else(|| TransitError::MissingDistance {
                from: StopName::new(from),
                to: StopName::new(to),
            })
    }

    pub fn distance_between(&self, from: StopId, to: StopId) -> Option<u32> {
        self.distances
            .get(&(from, to))
            .or_else(|| self.distances.get(&(to, from)))
            .copied()
    }

    // ---- Accessors ----

    /// All stops in insertion order
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// All buses in insertion order
    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    pub fn stop(&self, name: &str) -> Option<&Stop> {
        self.stop_index.get(name).map(|id| &self.stops[id.index()])
    }

    pub fn bus(&self, name: &str) -> Option<&Bus> {
        self.bus_index.get(name).map(|id| &self.buses[id.index()])
    }

    pub fn stop_by_id(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(id.index())
    }

    /// Stops of a bus walk, resolved, in driving order
    pub fn bus_stops<'a>(&'a self, bus: &'a Bus) -> impl Iterator<Item = &'a Stop> + 'a {
        bus.stops.iter().filter_map(|id| self.stop_by_id(*id))
    }

    pub fn buses_for_stop(&self, id: StopId) -> Option<&BTreeSet<BusName>> {
        self.stop_buses.get(id.index())
    }

    /// Every explicitly recorded distance as `(from, to, meters)`, sorted
    pub fn distances(&self) -> Vec<(StopId, StopId, u32)> {
        let mut distances: Vec<_> = self
            .distances
            .iter()
            .map(|(&(from, to), &meters)| (from, to, meters))
            .collect();
        distances.sort_unstable();
        distances
    }

    // ---- Internals ----

    fn stop_id(&self, name: &str) -> Result<StopId> {
        self.stop_index
            .get(name)
            .copied()
            .ok_or_else(|| TransitError::StopNotFound(StopName::new(name)))
    }

    fn next_id(&self, len: usize) -> Result<u32> {
        u32::try_from(len)
            .map_err(|_| TransitError::InvalidData("catalogue is full".to_string()))
    }

    /// Rebuild a catalogue from already validated parts (used by the snapshot
    /// reader). Indices are derived from the arenas.
    pub(crate) fn from_parts(
        stops: Vec<Stop>,
        buses: Vec<Bus>,
        distances: HashMap<(StopId, StopId), u32>,
        stop_buses: Vec<BTreeSet<BusName>>,
    ) -> Self {
        let stop_index = stops.iter().map(|s| (s.name.clone(), s.id)).collect();
        let bus_index = buses.iter().map(|b| (b.name.clone(), b.id)).collect();
        Self {
            stops,
            buses,
            stop_index,
            bus_index,
            distances,
            stop_buses,
        }
    }
}
