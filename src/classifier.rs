//! Labels torso extrema as anatomical joints.
//!
//! The head is the extremum above the torso centroid nearest the sensor,
//! centred on the run of torso nodes along its row. Shoulders are searched on
//! an arc around the head. Hands are the extrema reaching out past their
//! shoulder, and each elbow is the torso node nearest the middle of its
//! shoulder and hand.

use nalgebra as na;

use crate::config::TrackerConfig;
use crate::extrema::Torso;
use crate::graph::Graph;
use crate::joint::{Joint, JointId, JointMap};
use crate::math;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// Side of grid column `col` relative to the head. Columns within half a
    /// cell of the head belong to neither side.
    fn of(head_col: f32, col: usize) -> Option<Self> {
        let offset = col as f32 - head_col;

        if offset <= -0.5 {
            Some(Side::Left)
        } else if offset >= 0.5 {
            Some(Side::Right)
        } else {
            None
        }
    }

    fn joints(self) -> (JointId, JointId, JointId) {
        match self {
            Side::Left => (JointId::LeftShoulder, JointId::LeftElbow, JointId::LeftHand),
            Side::Right => (
                JointId::RightShoulder,
                JointId::RightElbow,
                JointId::RightHand,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Head {
    node: usize,
    position: na::Point3<f32>,
    /// Fractional grid column of `position`.
    col: f32,
}

pub fn classify(graph: &Graph, torso: &Torso<'_>, config: &TrackerConfig) -> JointMap {
    let mut joints = JointMap::new();

    let head = match find_head(graph, torso) {
        Some(head) => head,
        None => return joints,
    };

    let joint = |id, position: na::Point3<f32>| {
        Joint::new(id, position, graph.projection.to_screen(&position))
    };

    joints.insert(JointId::Head, joint(JointId::Head, head.position));

    for side in [Side::Left, Side::Right] {
        let (shoulder_id, elbow_id, hand_id) = side.joints();

        let shoulder = match find_shoulder(graph, torso, &head.position, side, config) {
            Some(shoulder) => shoulder,
            None => continue,
        };
        joints.insert(shoulder_id, joint(shoulder_id, graph.nodes[shoulder].position));

        let hand = match find_hand(graph, torso, &head, shoulder, side, config) {
            Some(hand) => hand,
            None => continue,
        };
        joints.insert(hand_id, joint(hand_id, graph.nodes[hand].position));

        let elbow = find_elbow(graph, torso, shoulder, hand);
        joints.insert(elbow_id, joint(elbow_id, graph.nodes[elbow].position));
    }

    log::trace!(
        "classified {} joints around head at {:?}",
        joints.len(),
        head.position
    );

    joints
}

/// The extremum above the torso centroid closest to the sensor, topmost on
/// ties. A flat top edge reports its middle rather than the corner the
/// extremum landed on.
fn find_head(graph: &Graph, torso: &Torso<'_>) -> Option<Head> {
    let centroid = torso.centroid();

    let node = torso
        .extrema
        .iter()
        .copied()
        .filter(|&idx| graph.nodes[idx].position.y < centroid.y)
        .min_by(|&a, &b| {
            let (pa, pb) = (&graph.nodes[a].position, &graph.nodes[b].position);
            pa.z.total_cmp(&pb.z).then(pa.y.total_cmp(&pb.y))
        })?;

    let mut run = vec![node];
    run.extend(walk_row(graph, torso, node, Side::Left));
    run.extend(walk_row(graph, torso, node, Side::Right));

    let position = math::centroid(run.iter().map(|&idx| &graph.nodes[idx].position))?;
    let col = graph.projection.to_grid(&position).x;

    Some(Head {
        node,
        position,
        col,
    })
}

/// Torso nodes met walking from `node` along its grid row towards `side`, up
/// to the first gap.
fn walk_row(graph: &Graph, torso: &Torso<'_>, node: usize, side: Side) -> Vec<usize> {
    let row = graph.nodes[node].row;
    let mut col = graph.nodes[node].col;
    let mut nodes = Vec::new();

    loop {
        col = match side {
            Side::Left => match col.checked_sub(1) {
                Some(col) => col,
                None => break,
            },
            Side::Right => col + 1,
        };

        match graph.node_at(col, row).filter(|&idx| torso.contains(idx)) {
            Some(idx) => nodes.push(idx),
            None => break,
        }
    }

    nodes
}

/// Walks the arc below the head on one side and returns the torso node whose
/// depth is closest to the head's.
fn find_shoulder(
    graph: &Graph,
    torso: &Torso<'_>,
    head: &na::Point3<f32>,
    side: Side,
    config: &TrackerConfig,
) -> Option<usize> {
    let radius = config.shoulders_circumference_radius as f32;
    let start = config.shoulders_arc_start_point as f32 / radius;
    let end = (config.shoulders_arc_start_point + config.shoulders_arc_length) as f32 / radius;
    let step = config
        .shoulders_search_step
        .max(*crate::config::SEARCH_STEP_RANGE.start());

    let mut best: Option<(usize, f32)> = None;
    let mut angle = start;

    while angle <= end {
        let sample = na::Point3::new(
            head.x + side.sign() * radius * angle.sin(),
            head.y + radius * angle.cos(),
            head.z,
        );

        let node = graph
            .projection
            .to_cell(&sample)
            .and_then(|(col, row)| graph.node_at(col, row))
            .filter(|&idx| torso.contains(idx));

        if let Some(idx) = node {
            let dz = (graph.nodes[idx].position.z - head.z).abs();
            if best.map_or(true, |(_, bz)| dz < bz) {
                best = Some((idx, dz));
            }
        }

        angle += step;
    }

    best.map(|(idx, _)| idx)
}

/// The farthest extremum from the shoulder among those reaching past it
/// sideways and at least `hands-minimum-distance` away. Below the torso
/// centroid a hand must also clear the trunk, whose width is taken along the
/// row of the torso center, so hips never qualify.
fn find_hand(
    graph: &Graph,
    torso: &Torso<'_>,
    head: &Head,
    shoulder: usize,
    side: Side,
    config: &TrackerConfig,
) -> Option<usize> {
    let min_distance = config.hands_minimum_distance as f32;
    let lateral = |idx: usize| (graph.nodes[idx].col as f32 - head.col).abs();

    let shoulder_reach = lateral(shoulder);
    let trunk_reach = walk_row(graph, torso, torso.center, side)
        .last()
        .map_or_else(|| lateral(torso.center), |&idx| lateral(idx));
    let centroid = torso.centroid();

    let mut best: Option<(usize, f32)> = None;
    for &idx in &torso.extrema {
        if idx == head.node || Side::of(head.col, graph.nodes[idx].col) != Some(side) {
            continue;
        }

        let reach = lateral(idx);
        if reach <= shoulder_reach {
            continue;
        }

        if graph.nodes[idx].position.y > centroid.y && reach <= trunk_reach {
            continue;
        }

        let d = graph.distance(shoulder, idx);
        if d >= min_distance && best.map_or(true, |(_, bd)| d > bd) {
            best = Some((idx, d));
        }
    }

    best.map(|(idx, _)| idx)
}

fn find_elbow(graph: &Graph, torso: &Torso<'_>, shoulder: usize, hand: usize) -> usize {
    let middle = na::center(
        &graph.nodes[shoulder].position,
        &graph.nodes[hand].position,
    );

    torso.nearest_node(graph, &middle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{component, extrema};
    use ndarray::{s, Array2};

    fn run(depth: &Array2<u16>, config: &TrackerConfig) -> (Graph, JointMap) {
        let graph = Graph::build(
            depth.view(),
            config.dimension_reduction,
            config.graph_distance_threshold as f32,
        );
        let components = component::extract(&graph, config.graph_minimum_number_nodes as usize);
        let torso = extrema::locate(
            &graph,
            &components,
            config.torso_minimum_number_nodes as usize,
            config.extrema_sphere_radius as f32,
            &config.focus(),
        )
        .unwrap();

        let joints = classify(&graph, &torso, config);
        (graph, joints)
    }

    fn cell(graph: &Graph, joints: &JointMap, id: JointId) -> (usize, usize) {
        graph.projection.to_cell(&joints[&id].position).unwrap()
    }

    /// Flat upper body facing the sensor with both arms stretched sideways.
    fn t_pose() -> Array2<u16> {
        let mut depth = Array2::from_elem((30, 40), 0u16);
        depth.slice_mut(s![3..8, 19..22]).fill(1000); // head
        depth.slice_mut(s![8..21, 16..25]).fill(1000); // trunk
        depth.slice_mut(s![8..10, 4..16]).fill(1000); // left arm
        depth.slice_mut(s![8..10, 25..37]).fill(1000); // right arm
        depth
    }

    /// Upright block nine cells wide, leaning away from the sensor.
    fn wide_column() -> Array2<u16> {
        let mut depth = Array2::from_elem((30, 40), 0u16);
        for row in 3..27 {
            depth
                .slice_mut(s![row, 16..25])
                .fill(1000 + 5 * (row as u16 - 3));
        }

        depth
    }

    #[test]
    fn t_pose_yields_every_joint() {
        let config = TrackerConfig::default();
        let (graph, joints) = run(&t_pose(), &config);

        for id in JointId::ALL {
            assert!(joints.contains_key(&id), "missing {}", id);
        }

        assert_eq!(cell(&graph, &joints, JointId::Head), (20, 3));
        assert_eq!(cell(&graph, &joints, JointId::LeftHand), (4, 8));
        assert_eq!(cell(&graph, &joints, JointId::RightHand), (36, 8));

        let left = joints[&JointId::LeftHand].position;
        let left_shoulder = joints[&JointId::LeftShoulder].position;
        assert!(na::distance(&left, &left_shoulder) >= config.hands_minimum_distance as f32);
    }

    #[test]
    fn short_arms_are_not_hands() {
        let config = TrackerConfig {
            hands_minimum_distance: 5000,
            ..Default::default()
        };
        let (_, joints) = run(&t_pose(), &config);

        assert!(joints.contains_key(&JointId::Head));
        assert!(joints.contains_key(&JointId::LeftShoulder));
        assert!(joints.contains_key(&JointId::RightShoulder));
        assert!(!joints.contains_key(&JointId::LeftHand));
        assert!(!joints.contains_key(&JointId::RightHand));
        assert!(!joints.contains_key(&JointId::LeftElbow));
        assert!(!joints.contains_key(&JointId::RightElbow));
    }

    #[test]
    fn elbow_lies_between_shoulder_and_hand() {
        let (_, joints) = run(&t_pose(), &TrackerConfig::default());

        let shoulder = joints[&JointId::RightShoulder].position;
        let elbow = joints[&JointId::RightElbow].position;
        let hand = joints[&JointId::RightHand].position;

        assert!(shoulder.x < elbow.x && elbow.x < hand.x);
    }

    #[test]
    fn trunk_corners_are_not_hands() {
        let (graph, joints) = run(&wide_column(), &TrackerConfig::default());

        assert_eq!(cell(&graph, &joints, JointId::Head), (20, 3));
        assert!(joints.contains_key(&JointId::LeftShoulder));
        assert!(joints.contains_key(&JointId::RightShoulder));

        for id in [
            JointId::LeftHand,
            JointId::RightHand,
            JointId::LeftElbow,
            JointId::RightElbow,
        ] {
            assert!(!joints.contains_key(&id), "unexpected {}", id);
        }
    }

    #[test]
    fn head_is_the_nearest_block_on_top() {
        let mut depth = Array2::from_elem((30, 40), 0u16);
        depth.slice_mut(s![3..8, 19..22]).fill(1080);
        depth.slice_mut(s![8..27, 16..25]).fill(1100);

        let (graph, joints) = run(&depth, &TrackerConfig::default());

        assert_eq!(cell(&graph, &joints, JointId::Head), (20, 3));
        assert_eq!(joints[&JointId::Head].coords().2, 1080);
        assert!(!joints.contains_key(&JointId::LeftHand));
        assert!(!joints.contains_key(&JointId::RightHand));
    }

    #[test]
    fn columns_next_to_the_head_have_no_side() {
        assert_eq!(Side::of(20.0, 20), None);
        assert_eq!(Side::of(20.3, 20), None);
        assert_eq!(Side::of(20.0, 19), Some(Side::Left));
        assert_eq!(Side::of(20.0, 21), Some(Side::Right));
    }
}
