use nalgebra as na;

use crate::graph::Graph;
use crate::math;

/// A connected subgraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Node indexes in discovery order.
    pub nodes: Vec<usize>,
    pub min: na::Point3<f32>,
    pub max: na::Point3<f32>,
    pub centroid: na::Point3<f32>,
}

impl Component {
    fn new(graph: &Graph, nodes: Vec<usize>) -> Self {
        let mut min = na::Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = na::Point3::new(f32::MIN, f32::MIN, f32::MIN);

        for &idx in &nodes {
            let p = &graph.nodes[idx].position;
            min = min.inf(p);
            max = max.sup(p);
        }

        let centroid = math::centroid(nodes.iter().map(|&idx| &graph.nodes[idx].position))
            .unwrap_or(min);

        Self {
            nodes,
            min,
            max,
            centroid,
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

    /// Membership mask over all graph nodes.
    pub fn mask(&self, graph_len: usize) -> Vec<bool> {
        let mut mask = vec![false; graph_len];
        for &idx in &self.nodes {
            mask[idx] = true;
        }

        mask
    }
}

/// Splits the graph into maximal connected components and drops those with
/// fewer than `min_nodes` nodes. Nodes without edges never form a component.
/// Survivors are sorted largest first; equal sizes keep discovery order.
pub fn extract(graph: &Graph, min_nodes: usize) -> Vec<Component> {
    let mut visited = vec![false; graph.len()];
    let mut components = Vec::new();

    for seed in 0..graph.len() {
        if visited[seed] || graph.nodes[seed].neighbors.is_empty() {
            continue;
        }

        let mut nodes = Vec::new();
        let mut stack = vec![seed];
        visited[seed] = true;

        while let Some(current) = stack.pop() {
            nodes.push(current);

            for &next in &graph.nodes[current].neighbors {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }

        if nodes.len() >= min_nodes {
            components.push(Component::new(graph, nodes));
        }
    }

    // stable, so ties stay in discovery order
    components.sort_by(|a, b| b.len().cmp(&a.len()));

    log::trace!(
        "{} components with at least {} nodes",
        components.len(),
        min_nodes
    );

    components
}
