use std::fmt::Display;
use std::ops::RangeInclusive;

use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::error::Error;

pub const DIMENSION_REDUCTION_RANGE: RangeInclusive<u32> = 1..=1024;
pub const DISTANCE_RANGE: RangeInclusive<u32> = 0..=65535;
pub const NONZERO_DISTANCE_RANGE: RangeInclusive<u32> = 1..=65535;
pub const SEARCH_STEP_RANGE: RangeInclusive<f32> = 0.01..=std::f32::consts::PI;
pub const SMOOTHING_FACTOR_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// Tunable parameters of the skeleton tracker.
///
/// Distances are in millimetres. Serialized keys use the property names of the
/// native library (`dimension-reduction`, `graph-distance-threshold`, ...), and
/// missing keys fall back to the defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct TrackerConfig {
    /// Downsampling factor applied to incoming depth frames.
    pub dimension_reduction: u32,
    pub enable_smoothing: bool,
    /// Radius of the exclusion sphere around each accepted extremum.
    pub extrema_sphere_radius: u32,
    /// Maximum distance between two linked graph nodes. Zero disables linking.
    pub graph_distance_threshold: u32,
    /// Components smaller than this are dropped as noise.
    pub graph_minimum_number_nodes: u32,
    /// Minimum distance between a hand and its shoulder.
    pub hands_minimum_distance: u32,
    /// Number of frames a joint is held after it stops being detected.
    pub joints_persistency: u32,
    pub shoulders_arc_length: u32,
    pub shoulders_arc_start_point: u32,
    pub shoulders_circumference_radius: u32,
    /// Angular step of the shoulder search, in radians.
    pub shoulders_search_step: f32,
    /// Weight of the previous position when smoothing: 0 follows detections,
    /// 1 never moves.
    pub smoothing_factor: f32,
    pub torso_minimum_number_nodes: u32,
    /// Where the user is expected to stand, in millimetres. Picks the body
    /// when several components tie for the largest.
    pub focus_point: (i32, i32, i32),
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            dimension_reduction: 16,
            enable_smoothing: true,
            extrema_sphere_radius: 280,
            graph_distance_threshold: 150,
            graph_minimum_number_nodes: 5,
            hands_minimum_distance: 525,
            joints_persistency: 3,
            shoulders_arc_length: 250,
            shoulders_arc_start_point: 120,
            shoulders_circumference_radius: 290,
            shoulders_search_step: 0.01,
            smoothing_factor: 0.5,
            torso_minimum_number_nodes: 16,
            focus_point: (0, 0, 1000),
        }
    }
}

impl TrackerConfig {
    #[inline]
    pub fn focus(&self) -> na::Point3<f32> {
        let (x, y, z) = self.focus_point;
        na::Point3::new(x as f32, y as f32, z as f32)
    }

    pub fn validate(&self) -> Result<(), Error> {
        check_range(
            "dimension-reduction",
            self.dimension_reduction,
            DIMENSION_REDUCTION_RANGE,
        )?;
        check_range(
            "extrema-sphere-radius",
            self.extrema_sphere_radius,
            DISTANCE_RANGE,
        )?;
        check_range(
            "graph-distance-threshold",
            self.graph_distance_threshold,
            DISTANCE_RANGE,
        )?;
        check_range(
            "graph-minimum-number-nodes",
            self.graph_minimum_number_nodes,
            NONZERO_DISTANCE_RANGE,
        )?;
        check_range(
            "hands-minimum-distance",
            self.hands_minimum_distance,
            DISTANCE_RANGE,
        )?;
        check_range("joints-persistency", self.joints_persistency, DISTANCE_RANGE)?;
        check_range(
            "shoulders-arc-length",
            self.shoulders_arc_length,
            NONZERO_DISTANCE_RANGE,
        )?;
        check_range(
            "shoulders-arc-start-point",
            self.shoulders_arc_start_point,
            NONZERO_DISTANCE_RANGE,
        )?;
        check_range(
            "shoulders-circumference-radius",
            self.shoulders_circumference_radius,
            NONZERO_DISTANCE_RANGE,
        )?;
        check_range(
            "shoulders-search-step",
            self.shoulders_search_step,
            SEARCH_STEP_RANGE,
        )?;
        check_range(
            "smoothing-factor",
            self.smoothing_factor,
            SMOOTHING_FACTOR_RANGE,
        )?;
        check_range(
            "torso-minimum-number-nodes",
            self.torso_minimum_number_nodes,
            DISTANCE_RANGE,
        )?;

        Ok(())
    }
}

/// Fails with [`Error::InvalidParameter`] unless `value` lies within `range`.
/// NaN is never in range.
pub fn check_range<T>(name: &'static str, value: T, range: RangeInclusive<T>) -> Result<(), Error>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        return Ok(());
    }

    log::warn!("rejecting {} = {}", name, value);

    Err(Error::InvalidParameter {
        name,
        value: value.to_string(),
        expected: format!("[{}, {}]", range.start(), range.end()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TrackerConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_dimension_reduction_is_rejected() {
        let config = TrackerConfig {
            dimension_reduction: 0,
            ..Default::default()
        };

        match config.validate() {
            Err(Error::InvalidParameter { name, value, .. }) => {
                assert_eq!(name, "dimension-reduction");
                assert_eq!(value, "0");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn float_ranges_are_checked() {
        let config = TrackerConfig {
            smoothing_factor: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TrackerConfig {
            shoulders_search_step: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TrackerConfig {
            shoulders_search_step: 0.005,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_graph_distance_threshold_is_allowed() {
        let config = TrackerConfig {
            graph_distance_threshold: 0,
            ..Default::default()
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn deserializes_native_property_names() {
        let config: TrackerConfig = serde_json::from_str(
            r#"{ "dimension-reduction": 8, "enable-smoothing": false, "focus-point": [10, -20, 1200] }"#,
        )
        .unwrap();

        assert_eq!(config.dimension_reduction, 8);
        assert!(!config.enable_smoothing);
        assert_eq!(config.focus_point, (10, -20, 1200));
        assert_eq!(config.graph_distance_threshold, 150);
        assert_eq!(config.joints_persistency, 3);
    }
}
