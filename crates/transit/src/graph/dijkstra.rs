//! Single-source shortest path over non-negative weights.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::directed::{DirectedWeightedGraph, EdgeId, VertexId, Weight};

/// Optimal path: total weight plus the edges to follow, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Path<W> {
    pub weight: W,
    pub edges: Vec<EdgeId>,
}

struct QueueEntry<W> {
    cost: W,
    vertex: VertexId,
}

impl<W: PartialOrd> PartialEq for QueueEntry<W> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<W: PartialOrd> Eq for QueueEntry<W> {}

impl<W: PartialOrd> PartialOrd for QueueEntry<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap pops the cheapest entry. Vertex id breaks ties
// to keep the search deterministic.
impl<W: PartialOrd> Ord for QueueEntry<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

/// Dijkstra from `from` to `to`. `None` when `to` is unreachable or either
/// vertex is out of range.
pub fn shortest_path<W: Weight, D>(
    graph: &DirectedWeightedGraph<W, D>,
    from: VertexId,
    to: VertexId,
) -> Option<Path<W>> {
    let vertex_count = graph.vertex_count();
    if from >= vertex_count || to >= vertex_count {
        return None;
    }

    let mut dist: Vec<Option<W>> = vec![None; vertex_count];
    let mut prev_edge: Vec<Option<EdgeId>> = vec![None; vertex_count];

    dist[from] = Some(W::ZERO);
    let mut heap = BinaryHeap::new();
    heap.push(QueueEntry {
        cost: W::ZERO,
        vertex: from,
    });

    while let Some(QueueEntry { cost, vertex }) = heap.pop() {
        if vertex == to {
            return reconstruct(graph, &prev_edge, from, to, cost);
        }

        // Stale entry
        if dist[vertex].is_some_and(|best| cost > best) {
            continue;
        }

        for edge_id in graph.incident_edges(vertex) {
            let Some(edge) = graph.edge(edge_id) else {
                continue;
            };
            let next = cost + edge.weight;
            let improves = match dist[edge.to] {
                Some(best) => next < best,
                None => true,
            };
            if improves {
                dist[edge.to] = Some(next);
                prev_edge[edge.to] = Some(edge_id);
                heap.push(QueueEntry {
                    cost: next,
                    vertex: edge.to,
                });
            }
        }
    }

    None
}

fn reconstruct<W, D>(
    graph: &DirectedWeightedGraph<W, D>,
    prev_edge: &[Option<EdgeId>],
    from: VertexId,
    to: VertexId,
    weight: W,
) -> Option<Path<W>> {
    let mut edges = Vec::new();
    let mut current = to;
    while current != from {
        let edge_id = prev_edge[current]?;
        edges.push(edge_id);
        current = graph.edge(edge_id)?.from;
    }
    edges.reverse();
    Some(Path { weight, edges })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;

    fn graph_from(vertex_count: usize, edges: &[(VertexId, VertexId, f64)]) -> DirectedWeightedGraph<f64> {
        let mut graph = DirectedWeightedGraph::new(vertex_count);
        for &(from, to, weight) in edges {
            graph
                .add_edge(Edge {
                    from,
                    to,
                    weight,
                    data: (),
                })
                .unwrap();
        }
        graph
    }

    #[test]
    fn test_prefers_cheaper_detour() {
        // 0 -> 2 directly costs 10, via 1 costs 3
        let graph = graph_from(3, &[(0, 2, 10.0), (0, 1, 1.0), (1, 2, 2.0)]);

        let path = shortest_path(&graph, 0, 2).unwrap();
        assert_eq!(path.weight, 3.0);
        assert_eq!(path.edges, vec![1, 2]);
    }

    #[test]
    fn test_same_vertex_is_empty_path() {
        let graph = graph_from(2, &[(0, 1, 1.0)]);

        let path = shortest_path(&graph, 1, 1).unwrap();
        assert_eq!(path.weight, 0.0);
        assert!(path.edges.is_empty());
    }

    #[test]
    fn test_unreachable() {
        let graph = graph_from(3, &[(0, 1, 1.0), (2, 0, 1.0)]);

        assert!(shortest_path(&graph, 0, 2).is_none());
        assert!(shortest_path(&graph, 0, 7).is_none());
    }

    #[test]
    fn test_edges_are_directed() {
        let graph = graph_from(2, &[(0, 1, 4.0)]);

        assert!(shortest_path(&graph, 0, 1).is_some());
        assert!(shortest_path(&graph, 1, 0).is_none());
    }

    #[test]
    fn test_integer_weights() {
        let mut graph: DirectedWeightedGraph<u32, &str> = DirectedWeightedGraph::new(3);
        graph.add_edge(Edge { from: 0, to: 1, weight: 5, data: "a" }).unwrap();
        graph.add_edge(Edge { from: 1, to: 2, weight: 5, data: "b" }).unwrap();
        graph.add_edge(Edge { from: 0, to: 2, weight: 11, data: "c" }).unwrap();

        let path = shortest_path(&graph, 0, 2).unwrap();
        assert_eq!(path.weight, 10);
        let labels: Vec<_> = path.edges.iter().map(|&id| graph.edge(id).unwrap().data).collect();
        assert_eq!(labels, ["a", "b"]);
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let graph = graph_from(
            4,
            &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)],
        );

        let first = shortest_path(&graph, 0, 3).unwrap();
        for _ in 0..10 {
            assert_eq!(shortest_path(&graph, 0, 3).unwrap(), first);
        }
    }
}
