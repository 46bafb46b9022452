use std::ops::RangeInclusive;

use ndarray::prelude::*;

use crate::error::Error;

/// A depth image in millimetres, row-major, 0 meaning "no reading".
#[derive(Debug, Clone, Copy)]
pub struct DepthFrame<'a> {
    data: ArrayView2<'a, u16>,
}

impl<'a> DepthFrame<'a> {
    pub fn new(depth: &'a [u16], width: usize, height: usize) -> Result<Self, Error> {
        let mismatch = || Error::DimensionMismatch {
            width,
            height,
            len: depth.len(),
        };

        if width.checked_mul(height) != Some(depth.len()) {
            return Err(mismatch());
        }

        let data = ArrayView2::from_shape((height, width), depth).map_err(|_| mismatch())?;

        Ok(Self { data })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn view(&self) -> ArrayView2<'a, u16> {
        self.data
    }

    /// Downsamples by striding: every output cell takes the top-left sample of
    /// its `factor`x`factor` block. Partial blocks at the right and bottom edges
    /// are dropped.
    pub fn reduce(&self, factor: usize) -> Array2<u16> {
        let factor = factor.max(1);
        let rows = (self.height() / factor) * factor;
        let cols = (self.width() / factor) * factor;
        let step = factor as isize;

        self.data.slice(s![..rows;step, ..cols;step]).to_owned()
    }
}

/// Zeroes every sample outside `valid`. Used by callers to drop background and
/// sensor noise before tracking.
pub fn threshold(depth: &mut [u16], valid: RangeInclusive<u16>) {
    for v in depth.iter_mut() {
        if !valid.contains(&*v) {
            *v = 0;
        }
    }
}
