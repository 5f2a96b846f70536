//! Generic directed weighted graph and shortest path search.

pub mod dijkstra;
pub mod directed;

pub use dijkstra::{shortest_path, Path};
pub use directed::{DirectedWeightedGraph, Edge, EdgeId, GraphError, IncidentEdges, VertexId, Weight};
