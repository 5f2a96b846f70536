// ---------------------------------------------------------------------------
// Snapshot records: the on-disk shape of a built database
// ---------------------------------------------------------------------------

use std::collections::{BTreeSet, HashMap, HashSet};

use bitcode::{Decode, Encode};

use crate::catalogue::TransportCatalogue;
use crate::graph::Edge;
use crate::identifiers::*;
use crate::models::types::{Bus, Stop};
use crate::render::RenderSettings;
use crate::router::{EdgeKind, RouteGraph, RoutingSettings, StopVertices, TransportRouter};
use crate::spatial::point_from_lat_lng;

use super::SnapshotError;

#[derive(Encode, Decode, Clone, Debug, PartialEq)]
pub struct DatabaseSnapshot {
    pub catalogue: CatalogueSnapshot,
    pub render_settings: RenderSettings,
    pub router: RouterSnapshot,
}

// ---- Catalogue ----

#[derive(Encode, Decode, Clone, Debug, PartialEq)]
pub struct StopSnapshot {
    pub id: u32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Encode, Decode, Clone, Debug, PartialEq)]
pub struct BusSnapshot {
    pub id: u32,
    pub name: String,
    pub stops: Vec<u32>,
    pub is_roundtrip: bool,
    pub unique_stop_count: u64,
    pub geo_length: f64,
    pub route_length: u64,
}

#[derive(Encode, Decode, Clone, Debug, PartialEq)]
pub struct DistanceSnapshot {
    pub from: u32,
    pub to: u32,
    pub meters: u32,
}

#[derive(Encode, Decode, Clone, Debug, PartialEq)]
pub struct StopBusesSnapshot {
    pub stop: u32,
    pub buses: Vec<u32>,
}

#[derive(Encode, Decode, Clone, Debug, PartialEq)]
pub struct CatalogueSnapshot {
    pub stops: Vec<StopSnapshot>,
    pub buses: Vec<BusSnapshot>,
    pub distances: Vec<DistanceSnapshot>,
    pub stop_buses: Vec<StopBusesSnapshot>,
}

impl CatalogueSnapshot {
    pub fn capture(catalogue: &TransportCatalogue) -> Self {
        let stops = catalogue
            .stops()
            .iter()
            .map(|stop| StopSnapshot {
                id: stop.id.raw(),
                name: stop.name.to_string(),
                lat: stop.latitude(),
                lng: stop.longitude(),
            })
            .collect();

        let buses = catalogue
            .buses()
            .iter()
            .map(|bus| BusSnapshot {
                id: bus.id.raw(),
                name: bus.name.to_string(),
                stops: bus.stops.iter().map(|id| id.raw()).collect(),
                is_roundtrip: bus.is_roundtrip,
                unique_stop_count: bus.unique_stop_count as u64,
                geo_length: bus.geo_length,
                route_length: bus.route_length,
            })
            .collect();

        let distances = catalogue
            .distances()
            .into_iter()
            .map(|(from, to, meters)| DistanceSnapshot {
                from: from.raw(),
                to: to.raw(),
                meters,
            })
            .collect();

        let stop_buses = catalogue
            .stops()
            .iter()
            .filter_map(|stop| {
                let names = catalogue.buses_for_stop(stop.id)?;
                if names.is_empty() {
                    return None;
                }
                let buses = names
                    .iter()
                    .filter_map(|name| catalogue.bus(name.as_str()))
                    .map(|bus| bus.id.raw())
                    .collect();
                Some(StopBusesSnapshot {
                    stop: stop.id.raw(),
                    buses,
                })
            })
            .collect();

        Self {
            stops,
            buses,
            distances,
            stop_buses,
        }
    }

    /// Rebuild the catalogue, keeping the saved ids. Every id is checked.
    pub fn restore(self) -> Result<TransportCatalogue, SnapshotError> {
        let mut names = HashSet::with_capacity(self.stops.len());
        let mut stops = Vec::with_capacity(self.stops.len());
        for (index, record) in self.stops.into_iter().enumerate() {
            expect_dense("stop", record.id, index)?;
            if !names.insert(record.name.clone()) {
                return Err(corrupt(format!("duplicate stop {}", record.name)));
            }
            stops.push(Stop {
                id: StopId::new(record.id),
                name: StopName::new(record.name),
                location: point_from_lat_lng(record.lat, record.lng),
            });
        }
        let stop_id = |raw: u32| -> Result<StopId, SnapshotError> {
            if (raw as usize) < stops.len() {
                Ok(StopId::new(raw))
            } else {
                Err(corrupt(format!("unknown stop id {}", raw)))
            }
        };

        let mut bus_names = HashSet::with_capacity(self.buses.len());
        let mut buses = Vec::with_capacity(self.buses.len());
        for (index, record) in self.buses.into_iter().enumerate() {
            expect_dense("bus", record.id, index)?;
            if !bus_names.insert(record.name.clone()) {
                return Err(corrupt(format!("duplicate bus {}", record.name)));
            }
            if record.stops.len() < 2 {
                return Err(corrupt(format!("bus {} has fewer than 2 stops", record.name)));
            }
            let walk = record
                .stops
                .iter()
                .map(|&raw| stop_id(raw))
                .collect::<Result<Vec<_>, _>>()?;
            buses.push(Bus {
                id: BusId::new(record.id),
                name: BusName::new(record.name),
                stops: walk,
                is_roundtrip: record.is_roundtrip,
                unique_stop_count: record.unique_stop_count as usize,
                route_length: record.route_length,
                geo_length: record.geo_length,
            });
        }

        let mut distances = HashMap::with_capacity(self.distances.len());
        for record in self.distances {
            distances.insert((stop_id(record.from)?, stop_id(record.to)?), record.meters);
        }

        let mut stop_buses = vec![BTreeSet::new(); stops.len()];
        for record in self.stop_buses {
            let stop = stop_id(record.stop)?;
            for raw in record.buses {
                let bus: &Bus = buses
                    .get(raw as usize)
                    .ok_or_else(|| corrupt(format!("unknown bus id {}", raw)))?;
                stop_buses[stop.index()].insert(bus.name.clone());
            }
        }

        Ok(TransportCatalogue::from_parts(stops, buses, distances, stop_buses))
    }
}

// ---- Router ----

#[derive(Encode, Decode, Clone, Debug, PartialEq)]
pub struct EdgeSnapshot {
    pub from: u32,
    pub to: u32,
    pub weight: f64,
    pub is_wait: bool,
    /// Set for ride edges only
    pub bus: Option<String>,
    pub span_count: u32,
}

#[derive(Encode, Decode, Clone, Debug, PartialEq)]
pub struct VertexSnapshot {
    pub stop: String,
    pub vertex: u32,
}

#[derive(Encode, Decode, Clone, Debug, PartialEq)]
pub struct RouterSnapshot {
    pub settings: RoutingSettings,
    pub edges: Vec<EdgeSnapshot>,
    pub incidence_lists: Vec<Vec<u32>>,
    pub wait_vertices: Vec<VertexSnapshot>,
    pub board_vertices: Vec<VertexSnapshot>,
    /// Stop name owning each vertex, indexed by vertex id
    pub vertex_stops: Vec<String>,
}

impl RouterSnapshot {
    pub fn capture(router: &TransportRouter) -> Self {
        let graph = router.graph();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| {
                let (is_wait, bus, span_count) = match &edge.data {
                    EdgeKind::Wait => (true, None, 0),
                    EdgeKind::Ride { bus, span_count } => {
                        (false, Some(bus.to_string()), *span_count as u32)
                    }
                };
                EdgeSnapshot {
                    from: edge.from as u32,
                    to: edge.to as u32,
                    weight: edge.weight,
                    is_wait,
                    bus,
                    span_count,
                }
            })
            .collect();

        let incidence_lists = graph
            .incidence_lists()
            .iter()
            .map(|list| list.iter().map(|&id| id as u32).collect())
            .collect();

        let mut vertices: Vec<_> = router.all_stop_vertices().collect();
        vertices.sort_by(|a, b| a.0.cmp(b.0));
        let wait_vertices = vertices
            .iter()
            .map(|(name, v)| VertexSnapshot {
                stop: name.to_string(),
                vertex: v.wait as u32,
            })
            .collect();
        let board_vertices = vertices
            .iter()
            .map(|(name, v)| VertexSnapshot {
                stop: name.to_string(),
                vertex: v.board as u32,
            })
            .collect();

        Self {
            settings: router.settings(),
            edges,
            incidence_lists,
            wait_vertices,
            board_vertices,
            vertex_stops: router.vertex_stops().iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Reload the router without rerunning the graph build. Stop and bus
    /// names are resolved against `catalogue`, which must be the catalogue the
    /// router was built from.
    pub fn restore(self, catalogue: &TransportCatalogue) -> Result<TransportRouter, SnapshotError> {
        let stop_name = |name: &str| -> Result<StopName, SnapshotError> {
            catalogue
                .stop(name)
                .map(|s| s.name.clone())
                .ok_or_else(|| corrupt(format!("router references unknown stop {}", name)))
        };

        let vertex_stops = self
            .vertex_stops
            .iter()
            .map(|name| stop_name(name))
            .collect::<Result<Vec<_>, _>>()?;
        let vertex_count = vertex_stops.len();

        let mut graph = RouteGraph::new(vertex_count);
        for record in self.edges {
            let data = if record.is_wait {
                EdgeKind::Wait
            } else {
                let name = record
                    .bus
                    .ok_or_else(|| corrupt("ride edge without a bus".to_string()))?;
                let bus = catalogue
                    .bus(&name)
                    .ok_or_else(|| corrupt(format!("router references unknown bus {}", name)))?;
                EdgeKind::Ride {
                    bus: bus.name.clone(),
                    span_count: record.span_count as usize,
                }
            };
            graph
                .add_edge(Edge {
                    from: record.from as usize,
                    to: record.to as usize,
                    weight: record.weight,
                    data,
                })
                .map_err(|e| corrupt(e.to_string()))?;
        }

        let rebuilt_matches = graph.incidence_lists().len() == self.incidence_lists.len()
            && graph
                .incidence_lists()
                .iter()
                .zip(&self.incidence_lists)
                .all(|(rebuilt, saved)| rebuilt.iter().map(|&id| id as u32).eq(saved.iter().copied()));
        if !rebuilt_matches {
            return Err(corrupt("incidence lists do not match the edge list".to_string()));
        }

        let mut waits: HashMap<String, usize> = HashMap::with_capacity(self.wait_vertices.len());
        for record in self.wait_vertices {
            waits.insert(record.stop, checked_vertex(record.vertex, vertex_count)?);
        }

        let mut stop_vertices = HashMap::with_capacity(self.board_vertices.len());
        for record in self.board_vertices {
            let board = checked_vertex(record.vertex, vertex_count)?;
            let wait = waits
                .remove(&record.stop)
                .ok_or_else(|| corrupt(format!("stop {} has no wait vertex", record.stop)))?;
            stop_vertices.insert(stop_name(&record.stop)?, StopVertices { wait, board });
        }
        if let Some(stop) = waits.keys().next() {
            return Err(corrupt(format!("stop {} has no board vertex", stop)));
        }

        Ok(TransportRouter::from_parts(
            self.settings,
            graph,
            stop_vertices,
            vertex_stops,
        ))
    }
}

fn corrupt(reason: String) -> SnapshotError {
    SnapshotError::Corrupt(reason)
}

fn expect_dense(kind: &str, id: u32, index: usize) -> Result<(), SnapshotError> {
    if id as usize != index {
        return Err(corrupt(format!("{} id {} found at position {}", kind, id, index)));
    }
    Ok(())
}

fn checked_vertex(vertex: u32, vertex_count: usize) -> Result<usize, SnapshotError> {
    let vertex = vertex as usize;
    if vertex >= vertex_count {
        return Err(corrupt(format!("vertex {} out of range", vertex)));
    }
    Ok(vertex)
}
