use crate::config::{self, TrackerConfig};
use crate::depth::DepthFrame;
use crate::error::Error;
use crate::graph::Graph;
use crate::joint::JointMap;
use crate::smoothing::{JointState, Smoother, SmoothingParams};
use crate::{classifier, component, extrema, JointId};

/// Skeleton tracker for a single depth stream.
///
/// Each call to [`Tracker::track_joints`] runs the full pipeline on one frame
/// and updates the joint persistency state, so one instance must not be fed
/// frames from more than one stream.
#[derive(Debug, Clone)]
pub struct Tracker {
    config: TrackerConfig,
    smoother: Smoother,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            config,
            smoother: Smoother::new(),
        })
    }

    /// Finds the joints in a full resolution depth frame (millimetres, 0 for
    /// no reading). Joints that could not be found are absent from the result.
    pub fn track_joints(
        &mut self,
        depth: &[u16],
        width: usize,
        height: usize,
    ) -> Result<JointMap, Error> {
        let frame = DepthFrame::new(depth, width, height)?;
        let config = &self.config;

        let reduced = frame.reduce(config.dimension_reduction as usize);
        let graph = Graph::build(
            reduced.view(),
            config.dimension_reduction,
            config.graph_distance_threshold as f32,
        );
        let components = component::extract(&graph, config.graph_minimum_number_nodes as usize);

        let detected = extrema::locate(
            &graph,
            &components,
            config.torso_minimum_number_nodes as usize,
            config.extrema_sphere_radius as f32,
            &config.focus(),
        )
        .map(|torso| classifier::classify(&graph, &torso, config))
        .unwrap_or_default();

        log::trace!(
            "{} nodes, {} edges, {} components, {} joints detected",
            graph.len(),
            graph.edge_count(),
            components.len(),
            detected.len()
        );

        let params = SmoothingParams {
            enabled: config.enable_smoothing,
            factor: config.smoothing_factor,
            persistency: config.joints_persistency,
        };
        let joints = self.smoother.update(detected, &params);

        log::debug!("tracked {} joints", joints.len());

        Ok(joints)
    }

    /// Forgets every joint from previous frames.
    pub fn reset(&mut self) {
        self.smoother.clear();
    }

    #[inline]
    pub fn joint_state(&self, id: JointId) -> JointState {
        self.smoother.state(id)
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Replaces the whole configuration if it is valid.
    pub fn set_config(&mut self, config: TrackerConfig) -> Result<(), Error> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn focus_point(&self) -> (i32, i32, i32) {
        self.config.focus_point
    }

    pub fn set_focus_point(&mut self, x: i32, y: i32, z: i32) {
        self.config.focus_point = (x, y, z);
    }

    pub fn dimension_reduction(&self) -> u32 {
        self.config.dimension_reduction
    }

    pub fn set_dimension_reduction(&mut self, value: u32) -> Result<(), Error> {
        config::check_range(
            "dimension-reduction",
            value,
            config::DIMENSION_REDUCTION_RANGE,
        )?;
        self.config.dimension_reduction = value;
        Ok(())
    }

    pub fn smoothing(&self) -> bool {
        self.config.enable_smoothing
    }

    pub fn set_smoothing(&mut self, value: bool) {
        self.config.enable_smoothing = value;
    }

    pub fn extrema_sphere_radius(&self) -> u32 {
        self.config.extrema_sphere_radius
    }

    pub fn set_extrema_sphere_radius(&mut self, value: u32) -> Result<(), Error> {
        config::check_range("extrema-sphere-radius", value, config::DISTANCE_RANGE)?;
        self.config.extrema_sphere_radius = value;
        Ok(())
    }

    pub fn graph_distance_threshold(&self) -> u32 {
        self.config.graph_distance_threshold
    }

    pub fn set_graph_distance_threshold(&mut self, value: u32) -> Result<(), Error> {
        config::check_range("graph-distance-threshold", value, config::DISTANCE_RANGE)?;
        self.config.graph_distance_threshold = value;
        Ok(())
    }

    pub fn graph_minimum_number_nodes(&self) -> u32 {
        self.config.graph_minimum_number_nodes
    }

    pub fn set_graph_minimum_number_nodes(&mut self, value: u32) -> Result<(), Error> {
        config::check_range(
            "graph-minimum-number-nodes",
            value,
            config::NONZERO_DISTANCE_RANGE,
        )?;
        self.config.graph_minimum_number_nodes = value;
        Ok(())
    }

    pub fn hands_minimum_distance(&self) -> u32 {
        self.config.hands_minimum_distance
    }

    pub fn set_hands_minimum_distance(&mut self, value: u32) -> Result<(), Error> {
        config::check_range("hands-minimum-distance", value, config::DISTANCE_RANGE)?;
        self.config.hands_minimum_distance = value;
        Ok(())
    }

    pub fn joints_persistency(&self) -> u32 {
        self.config.joints_persistency
    }

    pub fn set_joints_persistency(&mut self, value: u32) -> Result<(), Error> {
        config::check_range("joints-persistency", value, config::DISTANCE_RANGE)?;
        self.config.joints_persistency = value;
        Ok(())
    }

    pub fn shoulders_arc_length(&self) -> u32 {
        self.config.shoulders_arc_length
    }

    pub fn set_shoulders_arc_length(&mut self, value: u32) -> Result<(), Error> {
        config::check_range(
            "shoulders-arc-length",
            value,
            config::NONZERO_DISTANCE_RANGE,
        )?;
        self.config.shoulders_arc_length = value;
        Ok(())
    }

    pub fn shoulders_arc_start_point(&self) -> u32 {
        self.config.shoulders_arc_start_point
    }

    pub fn set_shoulders_arc_start_point(&mut self, value: u32) -> Result<(), Error> {
        config::check_range(
            "shoulders-arc-start-point",
            value,
            config::NONZERO_DISTANCE_RANGE,
        )?;
        self.config.shoulders_arc_start_point = value;
        Ok(())
    }

    pub fn shoulders_circumference_radius(&self) -> u32 {
        self.config.shoulders_circumference_radius
    }

    pub fn set_shoulders_circumference_radius(&mut self, value: u32) -> Result<(), Error> {
        config::check_range(
            "shoulders-circumference-radius",
            value,
            config::NONZERO_DISTANCE_RANGE,
        )?;
        self.config.shoulders_circumference_radius = value;
        Ok(())
    }

    pub fn shoulders_search_step(&self) -> f32 {
        self.config.shoulders_search_step
    }

    pub fn set_shoulders_search_step(&mut self, value: f32) -> Result<(), Error> {
        config::check_range(
            "shoulders-search-step",
            value,
            config::SEARCH_STEP_RANGE,
        )?;
        self.config.shoulders_search_step = value;
        Ok(())
    }

    pub fn smoothing_factor(&self) -> f32 {
        self.config.smoothing_factor
    }

    pub fn set_smoothing_factor(&mut self, value: f32) -> Result<(), Error> {
        config::check_range(
            "smoothing-factor",
            value,
            config::SMOOTHING_FACTOR_RANGE,
        )?;
        self.config.smoothing_factor = value;
        Ok(())
    }

    pub fn torso_minimum_number_nodes(&self) -> u32 {
        self.config.torso_minimum_number_nodes
    }

    pub fn set_torso_minimum_number_nodes(&mut self, value: u32) -> Result<(), Error> {
        config::check_range(
            "torso-minimum-number-nodes",
            value,
            config::DISTANCE_RANGE,
        )?;
        self.config.torso_minimum_number_nodes = value;
        Ok(())
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self {
            config: TrackerConfig::default(),
            smoother: Smoother::new(),
        }
    }
}

impl crate::JointTracking for Tracker {
    #[inline]
    fn track(&mut self, depth: &[u16], width: usize, height: usize) -> Result<JointMap, Error> {
        self.track_joints(depth, width, height)
    }

    #[inline]
    fn reset(&mut self) {
        Tracker::reset(self)
    }
}
