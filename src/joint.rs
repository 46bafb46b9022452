use std::collections::BTreeMap;
use std::fmt;

use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// Joints found in one frame. A joint that was not found is absent.
pub type JointMap = BTreeMap<JointId, Joint>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JointId {
    Head,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftHand,
    RightHand,
}

impl JointId {
    pub const ALL: [JointId; 7] = [
        JointId::Head,
        JointId::LeftShoulder,
        JointId::RightShoulder,
        JointId::LeftElbow,
        JointId::RightElbow,
        JointId::LeftHand,
        JointId::RightHand,
    ];
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JointId::Head => "head",
            JointId::LeftShoulder => "left shoulder",
            JointId::RightShoulder => "right shoulder",
            JointId::LeftElbow => "left elbow",
            JointId::RightElbow => "right elbow",
            JointId::LeftHand => "left hand",
            JointId::RightHand => "right hand",
        };

        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub id: JointId,

    // in mm
    pub position: na::Point3<f32>,

    // in px of the full resolution frame
    pub screen: na::Point2<f32>,
}

impl Joint {
    #[inline]
    pub fn new(id: JointId, position: na::Point3<f32>, screen: na::Point2<f32>) -> Self {
        Self {
            id,
            position,
            screen,
        }
    }

    /// Real world coordinates in millimetres.
    #[inline]
    pub fn coords(&self) -> (i32, i32, i32) {
        (
            self.position.x.round() as i32,
            self.position.y.round() as i32,
            self.position.z.round() as i32,
        )
    }

    #[inline]
    pub fn screen_coords(&self) -> (i32, i32) {
        (self.screen.x.round() as i32, self.screen.y.round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_native_library() {
        assert_eq!(JointId::Head.to_string(), "head");
        assert_eq!(JointId::LeftShoulder.to_string(), "left shoulder");
        assert_eq!(JointId::RightHand.to_string(), "right hand");
    }

    #[test]
    fn coords_are_rounded() {
        let joint = Joint::new(
            JointId::LeftElbow,
            na::Point3::new(-10.6, 20.4, 999.5),
            na::Point2::new(319.5, 12.2),
        );

        assert_eq!(joint.coords(), (-11, 20, 1000));
        assert_eq!(joint.screen_coords(), (320, 12));
    }
}
