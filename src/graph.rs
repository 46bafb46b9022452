use std::cmp::Ordering;
use std::collections::BinaryHeap;

use nalgebra as na;
use ndarray::prelude::*;
use rayon::prelude::*;

use crate::projection::Projection;

/// Chebyshev radius, in grid cells, of the window searched for neighbours.
const NEIGHBORHOOD: isize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub col: usize,
    pub row: usize,
    pub position: na::Point3<f32>,
    pub neighbors: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub projection: Projection,
    cells: Array2<Option<usize>>,
}

impl Graph {
    /// Creates one node per valid sample of the reduced grid and links every
    /// pair of nodes that are close on the grid and no farther than
    /// `threshold` millimetres apart. A zero threshold links nothing.
    pub fn build(depth: ArrayView2<'_, u16>, reduction: u32, threshold: f32) -> Self {
        let (rows, cols) = depth.dim();
        let projection = Projection::new(cols, rows, reduction);

        let mut cells = Array2::from_elem((rows, cols), None);
        let mut nodes = Vec::new();

        for ((row, col), &z) in depth.indexed_iter() {
            let z = z as f32;
            if z == 0.0 || !Projection::is_valid_depth(z) {
                continue;
            }

            cells[[row, col]] = Some(nodes.len());
            nodes.push(Node {
                col,
                row,
                position: projection.to_world(col, row, z),
                neighbors: Vec::new(),
            });
        }

        if threshold > 0.0 {
            let adjacency: Vec<Vec<usize>> = nodes
                .par_iter()
                .enumerate()
                .map(|(idx, node)| neighbors_of(idx, node, &nodes, &cells, threshold))
                .collect();

            for (node, neighbors) in nodes.iter_mut().zip(adjacency) {
                node.neighbors = neighbors;
            }
        }

        Self {
            nodes,
            projection,
            cells,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbors.len()).sum::<usize>() / 2
    }

    /// Node sitting on the reduced grid cell, if any.
    #[inline]
    pub fn node_at(&self, col: usize, row: usize) -> Option<usize> {
        self.cells.get([row, col]).copied().flatten()
    }

    #[inline]
    pub fn distance(&self, a: usize, b: usize) -> f32 {
        na::distance(&self.nodes[a].position, &self.nodes[b].position)
    }

    /// Shortest path length along graph edges from the nearest of `sources`
    /// to every node, restricted to nodes with `members[idx] == true`.
    /// Unreachable nodes get `f32::INFINITY`.
    pub fn geodesic_distances(&self, sources: &[usize], members: &[bool]) -> Vec<f32> {
        let mut dist = vec![f32::INFINITY; self.nodes.len()];
        let mut heap = BinaryHeap::new();

        for &src in sources {
            if members[src] {
                dist[src] = 0.0;
                heap.push(Visit {
                    dist: 0.0,
                    node: src,
                });
            }
        }

        while let Some(Visit { dist: d, node }) = heap.pop() {
            if d > dist[node] {
                continue;
            }

            for &next in &self.nodes[node].neighbors {
                if !members[next] {
                    continue;
                }

                let nd = d + self.distance(node, next);
                if nd < dist[next] {
                    dist[next] = nd;
                    heap.push(Visit {
                        dist: nd,
                        node: next,
                    });
                }
            }
        }

        dist
    }
}

fn neighbors_of(
    idx: usize,
    node: &Node,
    nodes: &[Node],
    cells: &Array2<Option<usize>>,
    threshold: f32,
) -> Vec<usize> {
    let (rows, cols) = cells.dim();
    let mut neighbors = Vec::new();

    for dr in -NEIGHBORHOOD..=NEIGHBORHOOD {
        for dc in -NEIGHBORHOOD..=NEIGHBORHOOD {
            let r = node.row as isize + dr;
            let c = node.col as isize + dc;

            if r < 0 || c < 0 || r >= rows as isize || c >= cols as isize {
                continue;
            }

            if let Some(other) = cells[[r as usize, c as usize]] {
                if other != idx && na::distance(&node.position, &nodes[other].position) <= threshold
                {
                    neighbors.push(other);
                }
            }
        }
    }

    neighbors
}

/// Min-heap entry for Dijkstra.
#[derive(Debug, Clone, Copy)]
struct Visit {
    dist: f32,
    node: usize,
}

impl PartialEq for Visit {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Visit {}

impl PartialOrd for Visit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Visit {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(cols: usize, rows: usize, z: u16) -> Array2<u16> {
        Array2::from_elem((rows, cols), z)
    }

    #[test]
    fn skips_empty_samples() {
        let mut depth = flat(4, 3, 1000);
        depth[[1, 2]] = 0;
        depth[[0, 0]] = 5;

        let graph = Graph::build(depth.view(), 16, 150.0);

        assert_eq!(graph.len(), 10);
        assert_eq!(graph.node_at(2, 1), None);
        assert_eq!(graph.node_at(0, 0), None);
        assert!(graph.node_at(1, 1).is_some());
    }

    #[test]
    fn adjacency_is_symmetric_without_self_edges() {
        let mut depth = flat(6, 5, 1000);
        depth[[2, 3]] = 1400;
        depth[[4, 0]] = 0;

        let graph = Graph::build(depth.view(), 16, 150.0);

        assert!(graph.edge_count() > 0);
        for (idx, node) in graph.nodes.iter().enumerate() {
            assert!(!node.neighbors.contains(&idx));
            for &n in &node.neighbors {
                assert!(graph.nodes[n].neighbors.contains(&idx));
                assert!(graph.distance(idx, n) <= 150.0);
            }
        }
    }

    #[test]
    fn depth_jumps_are_not_linked() {
        let mut depth = flat(6, 5, 1000);
        depth[[2, 3]] = 1400;

        let graph = Graph::build(depth.view(), 16, 150.0);
        let isolated = graph.node_at(3, 2).unwrap();

        assert!(graph.nodes[isolated].neighbors.is_empty());
    }

    #[test]
    fn zero_threshold_links_nothing() {
        let graph = Graph::build(flat(6, 5, 1000).view(), 16, 0.0);

        assert_eq!(graph.len(), 30);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn geodesic_distances_follow_edges() {
        // single row, so the only path between the ends runs through the middle
        let graph = Graph::build(flat(5, 1, 1000).view(), 16, 400.0);
        let members = vec![true; graph.len()];

        let dist = graph.geodesic_distances(&[0], &members);
        let step = graph.distance(0, 1);

        assert_eq!(dist[0], 0.0);
        assert!((dist[1] - step).abs() < 1e-3);
        assert!((dist[4] - 4.0 * step).abs() < 1e-2);

        let mut members = members;
        members[2] = false;
        members[3] = false;
        let dist = graph.geodesic_distances(&[0], &members);
        assert!(dist[4].is_infinite());
    }
}
