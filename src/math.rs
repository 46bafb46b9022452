use nalgebra as na;
use num_traits::Float;

/// Moves `prev` towards `next`, keeping `weight` of `prev`: 0 jumps straight
/// to `next`, 1 stays put.
#[inline]
pub fn blend<F: Float>(prev: F, next: F, weight: F) -> F {
    prev * weight + next * (F::one() - weight)
}

pub fn blend_point3(
    prev: &na::Point3<f32>,
    next: &na::Point3<f32>,
    weight: f32,
) -> na::Point3<f32> {
    na::Point3::new(
        blend(prev.x, next.x, weight),
        blend(prev.y, next.y, weight),
        blend(prev.z, next.z, weight),
    )
}

pub fn blend_point2(
    prev: &na::Point2<f32>,
    next: &na::Point2<f32>,
    weight: f32,
) -> na::Point2<f32> {
    na::Point2::new(blend(prev.x, next.x, weight), blend(prev.y, next.y, weight))
}

pub fn centroid<'a, I>(points: I) -> Option<na::Point3<f32>>
where
    I: IntoIterator<Item = &'a na::Point3<f32>>,
{
    let mut sum = na::Vector3::zeros();
    let mut count = 0usize;

    for p in points {
        sum += p.coords;
        count += 1;
    }

    if count == 0 {
        return None;
    }

    Some((sum / count as f32).into())
}
