use nalgebra as na;

use crate::component::Component;
use crate::graph::Graph;

/// The body component along with its geometric extrema.
#[derive(Debug, Clone)]
pub struct Torso<'a> {
    pub component: &'a Component,
    pub mask: Vec<bool>,
    /// Torso node nearest the centroid, the origin of the extrema search.
    pub center: usize,
    /// Extremum nodes in the order they were accepted.
    pub extrema: Vec<usize>,
}

impl<'a> Torso<'a> {
    #[inline]
    pub fn contains(&self, node: usize) -> bool {
        self.mask.get(node).copied().unwrap_or(false)
    }

    #[inline]
    pub fn centroid(&self) -> &na::Point3<f32> {
        &self.component.centroid
    }

    /// Torso node closest to `p`; ties go to the first in discovery order.
    pub fn nearest_node(&self, graph: &Graph, p: &na::Point3<f32>) -> usize {
        let mut best = self.center;
        let mut best_dist = f32::INFINITY;

        for &idx in &self.component.nodes {
            let d = na::distance(&graph.nodes[idx].position, p);
            if d < best_dist {
                best = idx;
                best_dist = d;
            }
        }

        best
    }
}

/// Picks the largest component as the torso and finds its extrema. When
/// several components share the largest size, the one whose centroid is
/// nearest `focus` wins. Returns `None` when no component reaches `min_nodes`.
pub fn locate<'a>(
    graph: &Graph,
    components: &'a [Component],
    min_nodes: usize,
    sphere_radius: f32,
    focus: &na::Point3<f32>,
) -> Option<Torso<'a>> {
    let largest = components.first()?.len();
    if largest == 0 || largest < min_nodes {
        log::trace!("no torso: largest component has {} nodes", largest);
        return None;
    }

    let mut component = &components[0];
    let mut best = f32::INFINITY;
    for c in components.iter().take_while(|c| c.len() == largest) {
        let d = na::distance(&c.centroid, focus);
        if d < best {
            component = c;
            best = d;
        }
    }

    let mask = component.mask(graph.len());
    let mut torso = Torso {
        component,
        mask,
        center: component.nodes[0],
        extrema: Vec::new(),
    };

    torso.center = torso.nearest_node(graph, &component.centroid);
    torso.extrema = find_extrema(graph, &torso, sphere_radius);

    log::trace!(
        "torso of {} nodes with {} extrema",
        component.len(),
        torso.extrema.len()
    );

    Some(torso)
}

/// Extrema are the local maxima of the geodesic distance from the torso
/// center. They are accepted farthest first; candidates within
/// `sphere_radius` of an accepted extremum are skipped.
fn find_extrema(graph: &Graph, torso: &Torso<'_>, sphere_radius: f32) -> Vec<usize> {
    let dist = graph.geodesic_distances(&[torso.center], &torso.mask);

    let mut candidates: Vec<usize> = torso
        .component
        .nodes
        .iter()
        .copied()
        .filter(|&idx| {
            let d = dist[idx];
            d.is_finite()
                && d > 0.0
                && graph.nodes[idx]
                    .neighbors
                    .iter()
                    .all(|&n| !torso.contains(n) || dist[n] <= d)
        })
        .collect();

    // farthest first, then by node index for determinism
    candidates.sort_by(|&a, &b| dist[b].total_cmp(&dist[a]).then(a.cmp(&b)));

    let mut extrema: Vec<usize> = Vec::new();
    for idx in candidates {
        if extrema
            .iter()
            .all(|&e| graph.distance(e, idx) > sphere_radius)
        {
            extrema.push(idx);
        }
    }

    extrema
}
