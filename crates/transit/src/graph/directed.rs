//! Append-only directed weighted graph with per-edge payloads.

use std::iter::Copied;
use std::ops::Add;
use std::slice;

pub type VertexId = usize;
pub type EdgeId = usize;

/// Edge weights must be non-negative for the shortest path search to be exact.
pub trait Weight: Copy + PartialOrd + Add<Output = Self> {
    const ZERO: Self;
}

impl Weight for f64 {
    const ZERO: Self = 0.0;
}

impl Weight for u32 {
    const ZERO: Self = 0;
}

/// A directed edge. `data` carries whatever the graph owner needs to
/// interpret the edge later.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge<W, D = ()> {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: W,
    pub data: D,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("Vertex {vertex} out of range (graph has {vertex_count} vertices)")]
    VertexOutOfRange {
        vertex: VertexId,
        vertex_count: usize,
    },
}

pub type IncidentEdges<'a> = Copied<slice::Iter<'a, EdgeId>>;

/// Directed graph over the dense vertex range `[0, vertex_count)`.
///
/// Edge ids are dense and assigned in insertion order. There is no removal.
#[derive(Clone, Debug)]
pub struct DirectedWeightedGraph<W, D = ()> {
    edges: Vec<Edge<W, D>>,
    incidence_lists: Vec<Vec<EdgeId>>,
}

impl<W, D> DirectedWeightedGraph<W, D> {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            incidence_lists: vec![Vec::new(); vertex_count],
        }
    }

    pub fn add_edge(&mut self, edge: Edge<W, D>) -> Result<EdgeId, GraphError> {
        let vertex_count = self.vertex_count();
        for vertex in [edge.from, edge.to] {
            if vertex >= vertex_count {
                return Err(GraphError::VertexOutOfRange {
                    vertex,
                    vertex_count,
                });
            }
        }

        let id = self.edges.len();
        self.incidence_lists[edge.from].push(id);
        self.edges.push(edge);
        Ok(id)
    }

    pub fn vertex_count(&self) -> usize {
        self.incidence_lists.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge<W, D>> {
        self.edges.get(id)
    }

    pub fn edges(&self) -> &[Edge<W, D>] {
        &self.edges
    }

    /// Ids of the edges leaving `vertex`, in insertion order.
    ///
    /// The iterator is `Clone`, so it can be restarted. An unknown vertex has
    /// no edges.
    pub fn incident_edges(&self, vertex: VertexId) -> IncidentEdges<'_> {
        self.incidence_lists
            .get(vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    pub fn incidence_lists(&self) -> &[Vec<EdgeId>] {
        &self.incidence_lists
    }
}

impl<W, D> Default for DirectedWeightedGraph<W, D> {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: VertexId, to: VertexId, weight: f64) -> Edge<f64> {
        Edge {
            from,
            to,
            weight,
            data: (),
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph: DirectedWeightedGraph<f64> = DirectedWeightedGraph::default();
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.incident_edges(0).count(), 0);
    }

    #[test]
    fn test_edge_ids_are_dense() {
        let mut graph = DirectedWeightedGraph::new(3);
        assert_eq!(graph.add_edge(edge(0, 1, 1.0)), Ok(0));
        assert_eq!(graph.add_edge(edge(1, 2, 2.0)), Ok(1));
        assert_eq!(graph.add_edge(edge(0, 2, 5.0)), Ok(2));

        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edge(1).map(|e| e.weight), Some(2.0));
        assert!(graph.edge(3).is_none());
    }

    #[test]
    fn test_incident_edges_in_insertion_order() {
        let mut graph = DirectedWeightedGraph::new(3);
        graph.add_edge(edge(0, 1, 1.0)).unwrap();
        graph.add_edge(edge(1, 2, 1.0)).unwrap();
        graph.add_edge(edge(0, 2, 1.0)).unwrap();

        let incident = graph.incident_edges(0);
        assert_eq!(incident.clone().collect::<Vec<_>>(), vec![0, 2]);
        // Restartable
        assert_eq!(incident.collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(graph.incident_edges(2).count(), 0);
    }

    #[test]
    fn test_rejects_out_of_range_vertex() {
        let mut graph = DirectedWeightedGraph::new(2);
        assert_eq!(
            graph.add_edge(edge(0, 2, 1.0)),
            Err(GraphError::VertexOutOfRange {
                vertex: 2,
                vertex_count: 2
            })
        );
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.incident_edges(0).count(), 0);
    }
}
