//! Catmull-Rom spline evaluation with alpha fixed at 0.5.
//!
//! `sample(c0, p0, p1, c1, t)` interpolates between `p0` (at `t = 0`) and `p1` (at `t = 1`), with
//! `c0` and `c1` only shaping the tangents.  Adjacent segments that share control points meet with
//! matching tangents.
//!
//! There are two implementations of the same function:
//!
//!  * [`scalar::sample`] collapses the basis into per-axis polynomial coefficients and evaluates
//!    them with Horner's method.
//!  * [`simd::sample`] computes the four control point weights once and accumulates the weighted
//!    points in 4-wide lanes.  On wasm32 with the `simd` feature this uses `simd128` intrinsics.
//!
//! [`sample`] is whichever one the crate was built with; the `simd` feature selects the lane-wise
//! version.

use common::Vec3;

/// `BASIS[power][point]`: the coefficient of `t^power` contributed by each of the control points
/// `[c0, p0, p1, c1]`.
const BASIS: [[f32; 4]; 4] = [
  [0., 1., 0., 0.],
  [-0.5, 0., 0.5, 0.],
  [1., -2.5, 2., -0.5],
  [-0.5, 1.5, -1.5, 0.5],
];

#[cfg(feature = "simd")]
pub use simd::sample;

#[cfg(not(feature = "simd"))]
pub use scalar::sample;

pub mod scalar {
  use super::BASIS;
  use common::Vec3;

  pub fn sample(c0: Vec3, p0: Vec3, p1: Vec3, c1: Vec3, t: f32) -> Vec3 {
    let coeff = |row: &[f32; 4]| c0 * row[0] + p0 * row[1] + p1 * row[2] + c1 * row[3];

    let k0 = coeff(&BASIS[0]);
    let k1 = coeff(&BASIS[1]);
    let k2 = coeff(&BASIS[2]);
    let k3 = coeff(&BASIS[3]);

    k0 + (k1 + (k2 + k3 * t) * t) * t
  }
}

pub mod simd {
  use super::BASIS;
  use common::Vec3;

  /// Weight of each of `[c0, p0, p1, c1]` at `t`.  At `t = 0` and `t = 1` these come out as exact
  /// unit vectors.
  #[inline(always)]
  fn weights(t: f32) -> [f32; 4] {
    let mut out = [0.; 4];
    for (point_ix, weight) in out.iter_mut().enumerate() {
      *weight = BASIS[0][point_ix]
        + t * (BASIS[1][point_ix] + t * (BASIS[2][point_ix] + t * BASIS[3][point_ix]));
    }
    out
  }

  #[cfg(all(feature = "simd", target_arch = "wasm32"))]
  fn weighted_sum(points: [Vec3; 4], weights: [f32; 4]) -> Vec3 {
    use std::arch::wasm32::*;

    let mut acc = f32x4_splat(0.);
    for (p, w) in points.iter().zip(weights) {
      acc = f32x4_add(acc, f32x4_mul(f32x4(p.x, p.y, p.z, 0.), f32x4_splat(w)));
    }

    Vec3::new(
      f32x4_extract_lane::<0>(acc),
      f32x4_extract_lane::<1>(acc),
      f32x4_extract_lane::<2>(acc),
    )
  }

  #[cfg(not(all(feature = "simd", target_arch = "wasm32")))]
  fn weighted_sum(points: [Vec3; 4], weights: [f32; 4]) -> Vec3 {
    use nalgebra::Vector4;

    let acc = points
      .iter()
      .zip(weights)
      .fold(Vector4::<f32>::zeros(), |acc, (p, w)| {
        acc + Vector4::new(p.x, p.y, p.z, 0.) * w
      });
    acc.xyz()
  }

  pub fn sample(c0: Vec3, p0: Vec3, p1: Vec3, c1: Vec3, t: f32) -> Vec3 {
    weighted_sum([c0, p0, p1, c1], weights(t))
  }
}

/// Samples `count` evenly spaced points in `[0, 1)` along the segment between `p0` and `p1`.
pub fn sample_segment(
  c0: Vec3,
  p0: Vec3,
  p1: Vec3,
  c1: Vec3,
  count: usize,
) -> impl Iterator<Item = Vec3> {
  (0..count).map(move |k| sample(c0, p0, p1, c1, k as f32 / count as f32))
}
