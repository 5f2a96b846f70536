//! Fastest-journey router over the catalogue.
//!
//! Every stop gets two vertices: a *wait* vertex (standing at the stop) and a
//! *board* vertex (sitting in a bus at the stop). A wait edge leads from the
//! first to the second and costs the fixed boarding wait. Ride edges lead from
//! a board vertex to the wait vertex of *every* later stop of the same bus
//! segment, so a single edge covers a whole ride and the search never pays a
//! per-stop penalty.

use std::collections::HashMap;

use crate::catalogue::TransportCatalogue;
use crate::graph::{shortest_path, DirectedWeightedGraph, Edge, EdgeId, VertexId};
use crate::identifiers::*;
use crate::models::{info::*, types::*};

const MINUTES_PER_HOUR: f64 = 60.0;
const METERS_PER_KILOMETER: f64 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(bitcode::Encode, bitcode::Decode)]
pub struct RoutingSettings {
    /// Minutes spent waiting for any bus at a stop
    pub bus_wait_time: u32,
    /// Bus speed in km/h
    pub bus_velocity: f64,
}

impl RoutingSettings {
    /// Minutes needed to drive `meters` at the bus velocity
    pub fn travel_time(&self, meters: f64) -> f64 {
        (MINUTES_PER_HOUR * meters) / (METERS_PER_KILOMETER * self.bus_velocity)
    }
}

/// What an edge of the routing graph means to a rider.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeKind {
    Wait,
    Ride { bus: BusName, span_count: usize },
}

/// The two vertices allocated for one stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StopVertices {
    pub wait: VertexId,
    pub board: VertexId,
}

impl StopVertices {
    fn for_stop(id: StopId) -> Self {
        Self {
            wait: 2 * id.index(),
            board: 2 * id.index() + 1,
        }
    }
}

pub type RouteGraph = DirectedWeightedGraph<f64, EdgeKind>;

/// Immutable once built; queries only read, so a router can be shared
/// between threads.
#[derive(Clone, Debug)]
pub struct TransportRouter {
    settings: RoutingSettings,
    graph: RouteGraph,
    stop_vertices: HashMap<StopName, StopVertices>,
    vertex_stops: Vec<StopName>,
}

impl TransportRouter {
    /// Build the routing graph for every stop and bus of `catalogue`.
    pub fn build(catalogue: &TransportCatalogue, settings: RoutingSettings) -> Result<Self> {
        if !(settings.bus_velocity > 0.0) {
            log::warn!(
                "Bus velocity {} km/h is not positive, travel times will be meaningless",
                settings.bus_velocity
            );
        }

        let stops = catalogue.stops();
        let mut stop_vertices = HashMap::with_capacity(stops.len());
        let mut vertex_stops = Vec::with_capacity(2 * stops.len());
        for stop in stops {
            let vertices = StopVertices::for_stop(stop.id);
            debug_assert_eq!(vertices.wait, vertex_stops.len());
            vertex_stops.push(stop.name.clone());
            vertex_stops.push(stop.name.clone());
            stop_vertices.insert(stop.name.clone(), vertices);
        }

        let mut router = Self {
            settings,
            graph: RouteGraph::new(vertex_stops.len()),
            stop_vertices,
            vertex_stops,
        };

        for bus in catalogue.buses() {
            router.add_bus_edges(catalogue, bus)?;
        }

        log::info!(
            "Routing graph built: {} vertices, {} edges",
            router.graph.vertex_count(),
            router.graph.edge_count()
        );
        Ok(router)
    }

    /// Fastest journey from stop `from` to stop `to`.
    ///
    /// Fails with `StopNotFound` for an unknown stop and `NoRoute` when no bus
    /// connects the two.
    pub fn build_route(&self, from: &str, to: &str) -> Result<RouteInfo> {
        let from_vertex = self.wait_vertex(from)?;
        let to_vertex = self.wait_vertex(to)?;

        let path = shortest_path(&self.graph, from_vertex, to_vertex).ok_or_else(|| {
            TransitError::NoRoute {
                from: StopName::new(from),
                to: StopName::new(to),
            }
        })?;

        let items = path
            .edges
            .iter()
            .map(|&id| self.route_item(id))
            .collect::<Result<Vec<_>>>()?;

        Ok(RouteInfo {
            total_time: path.weight,
            items,
        })
    }

    // ---- Accessors ----

    pub fn settings(&self) -> RoutingSettings {
        self.settings
    }

    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    pub fn stop_vertices(&self, name: &str) -> Option<StopVertices> {
        self.stop_vertices.get(name).copied()
    }

    /// Stop name owning each vertex, indexed by vertex id
    pub fn vertex_stops(&self) -> &[StopName] {
        &self.vertex_stops
    }

    pub fn all_stop_vertices(&self) -> impl Iterator<Item = (&StopName, StopVertices)> + '_ {
        self.stop_vertices.iter().map(|(name, v)| (name, *v))
    }

    // ---- Construction ----

    fn add_bus_edges(&mut self, catalogue: &TransportCatalogue, bus: &Bus) -> Result<()> {
        for segment in segments(bus) {
            self.add_segment_edges(catalogue, &bus.name, segment)?;
        }
        Ok(())
    }

    fn add_segment_edges(
        &mut self,
        catalogue: &TransportCatalogue,
        bus: &BusName,
        segment: &[StopId],
    ) -> Result<()> {
        let wait_time = f64::from(self.settings.bus_wait_time);
        let Some((_, boardable)) = segment.split_last() else {
            return Ok(());
        };

        for &stop in boardable {
            let vertices = StopVertices::for_stop(stop);
            self.graph.add_edge(Edge {
                from: vertices.wait,
                to: vertices.board,
                weight: wait_time,
                data: EdgeKind::Wait,
            })?;
        }

        for (i, &start) in segment.iter().enumerate() {
            let board = StopVertices::for_stop(start).board;
            let mut meters = 0u64;
            for j in (i + 1)..segment.len() {
                let (prev, next) = (segment[j - 1], segment[j]);
                meters += u64::from(missing_distance_check(catalogue, prev, next)?);
                self.graph.add_edge(Edge {
                    from: board,
                    to: StopVertices::for_stop(next).wait,
                    weight: self.settings.travel_time(meters as f64),
                    data: EdgeKind::Ride {
                        bus: bus.clone(),
                        span_count: j - i,
                    },
                })?;
            }
        }
        Ok(())
    }

    // ---- Queries ----

    fn wait_vertex(&self, name: &str) -> Result<VertexId> {
        self.stop_vertices
            .get(name)
            .map(|v| v.wait)
            .ok_or_else(|| TransitError::StopNotFound(StopName::new(name)))
    }

    fn route_item(&self, id: EdgeId) -> Result<RouteItem> {
        let edge = self
            .graph
            .edge(id)
            .ok_or_else(|| TransitError::InvalidData(format!("edge {} is missing", id)))?;

        Ok(match &edge.data {
            EdgeKind::Wait => {
                let stop = self.vertex_stops.get(edge.from).ok_or_else(|| {
                    TransitError::InvalidData(format!("vertex {} has no stop", edge.from))
                })?;
                RouteItem::Wait {
                    stop: stop.clone(),
                    time: edge.weight,
                }
            }
            EdgeKind::Ride { bus, span_count } => RouteItem::Ride {
                bus: bus.clone(),
                time: edge.weight,
                span_count: *span_count,
            },
        })
    }

    /// Reassemble a router from already validated parts (used by the
    /// snapshot reader).
    pub(crate) fn from_parts(
        settings: RoutingSettings,
        graph: RouteGraph,
        stop_vertices: HashMap<StopName, StopVertices>,
        vertex_stops: Vec<StopName>,
    ) -> Self {
        Self {
            settings,
            graph,
            stop_vertices,
            vertex_stops,
        }
    }
}

/// The stretches of a bus walk a rider can stay seated through.
///
/// A round trip is one segment. A there-and-back line splits at the
/// turnaround stop into an outbound and a return segment that share it.
fn segments(bus: &Bus) -> Vec<&[StopId]> {
    if bus.is_roundtrip {
        return vec![&bus.stops[..]];
    }
    let turnaround = bus.turnaround_index();
    vec![&bus.stops[..=turnaround], &bus.stops[turnaround..]]
}

fn missing_distance_check(
    catalogue: &TransportCatalogue,
    from: StopId,
    to: StopId,
) -> Result<u32> {
    catalogue.distance_between(from, to).ok_or_else(|| {
        let name = |id: StopId| {
            catalogue
                .stop_by_id(id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| StopName::new(id.to_string()))
        };
        TransitError::MissingDistance {
            from: name(from),
            to: name(to),
        }
    })
}
