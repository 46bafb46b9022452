use std::collections::BTreeMap;

use crate::joint::{Joint, JointId, JointMap};
use crate::math;

/// Per-joint outcome of the last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointState {
    /// Detected in the last frame.
    Fresh,
    /// Not detected, previous position reported for `misses` frames so far.
    Held { misses: u32 },
    /// Not detected for too long, dropped from the output.
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    pub enabled: bool,
    pub factor: f32,
    pub persistency: u32,
}

#[derive(Debug, Clone)]
struct JointTrack {
    joint: Joint,
    misses: u32,
}

/// Cross-frame joint state of a tracker: last reported position and miss
/// counter of every joint still alive.
#[derive(Debug, Default, Clone)]
pub struct Smoother {
    tracks: BTreeMap<JointId, JointTrack>,
}

impl Smoother {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn state(&self, id: JointId) -> JointState {
        match self.tracks.get(&id) {
            Some(t) if t.misses == 0 => JointState::Fresh,
            Some(t) => JointState::Held { misses: t.misses },
            None => JointState::Lost,
        }
    }

    /// Merges one frame of detections into the state and returns the joints
    /// to report.
    ///
    /// Fresh joints are blended with their previously reported position when
    /// smoothing is enabled. Missing joints are held at their previous
    /// position while they have been missed fewer than `persistency` times in
    /// a row, then dropped along with their history.
    pub fn update(&mut self, detected: JointMap, params: &SmoothingParams) -> JointMap {
        let mut reported = JointMap::new();

        for id in JointId::ALL {
            match detected.get(&id) {
                Some(raw) => {
                    let joint = match self.tracks.get(&id) {
                        Some(prev) if params.enabled => Joint::new(
                            id,
                            math::blend_point3(&prev.joint.position, &raw.position, params.factor),
                            math::blend_point2(&prev.joint.screen, &raw.screen, params.factor),
                        ),
                        _ => *raw,
                    };

                    self.tracks.insert(id, JointTrack { joint, misses: 0 });
                    reported.insert(id, joint);
                }

                None => {
                    let held = match self.tracks.get_mut(&id) {
                        Some(track) => {
                            track.misses += 1;
                            if track.misses < params.persistency {
                                Some(track.joint)
                            } else {
                                None
                            }
                        }
                        None => continue,
                    };

                    match held {
                        Some(joint) => {
                            reported.insert(id, joint);
                        }
                        None => {
                            log::trace!("lost {}", id);
                            self.tracks.remove(&id);
                        }
                    }
                }
            }
        }

        reported
    }
}
