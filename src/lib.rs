//! Human skeleton tracking on depth images.
//!
//! A depth frame is reduced, turned into a proximity graph over the real
//! world positions of its samples, and split into connected components. The
//! largest component is taken as the body: its geodesic extrema give the
//! head and hands, shoulders are searched on an arc below the head and elbows
//! sit between shoulders and hands. Joints are finally smoothed and held
//! across frames by the [`Tracker`].

pub mod classifier;
pub mod component;
pub mod config;
pub mod depth;
pub mod error;
pub mod extrema;
pub mod graph;
pub mod joint;
pub mod math;
pub mod projection;
pub mod smoothing;
pub mod tracker;

pub use config::TrackerConfig;
pub use depth::DepthFrame;
pub use error::Error;
pub use joint::{Joint, JointId, JointMap};
pub use tracker::Tracker;

pub trait JointTracking {
    fn track(&mut self, depth: &[u16], width: usize, height: usize) -> Result<JointMap, Error>;
    fn reset(&mut self);
}
