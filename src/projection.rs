//! Camera model mapping reduced grid samples to real world millimetres.
//!
//! Uses the OpenKinect approximation: lateral offsets grow linearly with
//! distance, scaled by a fixed sensor constant. The horizontal axis is also
//! scaled by the frame's aspect ratio.

use nalgebra as na;

const SCALE_FACTOR: f32 = 0.0021;
const DEPTH_OFFSET: f32 = -10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    width: f32,
    height: f32,
    reduction: f32,
    aspect: f32,
}

impl Projection {
    /// `width` and `height` are the dimensions of the reduced grid.
    pub fn new(width: usize, height: usize, reduction: u32) -> Self {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);

        Self {
            width: w,
            height: h,
            reduction: reduction.max(1) as f32,
            aspect: w.max(h) / w.min(h),
        }
    }

    /// Whether a depth reading can be projected at all.
    #[inline]
    pub fn is_valid_depth(z: f32) -> bool {
        z + DEPTH_OFFSET > 0.0
    }

    #[inline]
    fn lateral_scale(z: f32) -> f32 {
        (z + DEPTH_OFFSET) * SCALE_FACTOR
    }

    /// Real world position of the reduced grid sample (`col`, `row`) at depth `z`.
    pub fn to_world(&self, col: usize, row: usize, z: f32) -> na::Point3<f32> {
        let r = self.reduction;
        let scale = Self::lateral_scale(z);

        na::Point3::new(
            (col as f32 * r - self.width * r / 2.0) * scale * self.aspect,
            (row as f32 * r - self.height * r / 2.0) * scale,
            z,
        )
    }

    /// Full resolution pixel position of a real world point.
    pub fn to_screen(&self, p: &na::Point3<f32>) -> na::Point2<f32> {
        let r = self.reduction;
        let scale = Self::lateral_scale(p.z);

        if scale <= 0.0 {
            return na::Point2::new(self.width * r / 2.0, self.height * r / 2.0);
        }

        na::Point2::new(
            p.x / (scale * self.aspect) + self.width * r / 2.0,
            p.y / scale + self.height * r / 2.0,
        )
    }

    /// Position of a real world point on the reduced grid, in fractional cells.
    pub fn to_grid(&self, p: &na::Point3<f32>) -> na::Point2<f32> {
        let screen = self.to_screen(p);
        na::Point2::new(screen.x / self.reduction, screen.y / self.reduction)
    }

    /// Reduced grid cell closest to a real world point, if inside the grid.
    pub fn to_cell(&self, p: &na::Point3<f32>) -> Option<(usize, usize)> {
        let grid = self.to_grid(p);
        let col = grid.x.round();
        let row = grid.y.round();

        if col < 0.0 || row < 0.0 || col >= self.width || row >= self.height {
            return None;
        }

        Some((col as usize, row as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_center_maps_to_optical_axis() {
        let proj = Projection::new(40, 30, 16);
        let p = proj.to_world(20, 15, 1000.0);

        assert!(p.x.abs() < 1e-3);
        assert!(p.y.abs() < 1e-3);
        assert_eq!(p.z, 1000.0);
    }

    #[test]
    fn screen_is_inverse_of_world() {
        let proj = Projection::new(40, 30, 16);
        let p = proj.to_world(7, 22, 1234.0);
        let s = proj.to_screen(&p);

        assert!((s.x - 7.0 * 16.0).abs() < 1e-2);
        assert!((s.y - 22.0 * 16.0).abs() < 1e-2);
        assert_eq!(proj.to_cell(&p), Some((7, 22)));

        let grid = proj.to_grid(&p);
        assert!((grid.x - 7.0).abs() < 1e-3);
        assert!((grid.y - 22.0).abs() < 1e-3);
    }

    #[test]
    fn cells_outside_grid_are_none() {
        let proj = Projection::new(40, 30, 16);
        let p = proj.to_world(0, 0, 1000.0);
        let outside = na::Point3::new(p.x - 500.0, p.y, p.z);

        assert_eq!(proj.to_cell(&outside), None);
    }

    #[test]
    fn readings_below_offset_are_invalid() {
        assert!(!Projection::is_valid_depth(0.0));
        assert!(!Projection::is_valid_depth(10.0));
        assert!(Projection::is_valid_depth(11.0));
    }
}
