pub extern crate rand;
pub extern crate rand_pcg;

use std::fmt::{Debug, Display};

use nalgebra::{Vector2, Vector3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

pub mod ring_buffer;
pub use ring_buffer::{RingBuffer, RingBufferError};

pub type Vec2 = Vector2<f32>;
pub type Vec3 = Vector3<f32>;

/// Product of two vector lengths below which the angle between them is treated as 0.
const ANGLE_EPSILON: f32 = 1e-15;

pub fn build_rng(seed: (u64, u64)) -> Pcg32 {
  let mut bytes = [0u8; 16];
  bytes[..8].copy_from_slice(&seed.0.to_le_bytes());
  bytes[8..].copy_from_slice(&seed.1.to_le_bytes());
  Pcg32::from_seed(bytes)
}

pub fn clamp(val: f32, min: f32, max: f32) -> f32 {
  if val < min {
    return min;
  }
  if val > max {
    return max;
  }
  val
}

/// Returns the unsigned angle between `a` and `b` in degrees, in the range [0, 180].
///
/// If either vector is zero-length (or close enough that the angle is numerically meaningless),
/// the angle is 0.
pub fn angle_degrees(a: &Vec3, b: &Vec3) -> f32 {
  // the same expression is used for the dot product and both squared norms so that identical
  // inputs produce a cosine of exactly 1
  let dot = |u: &Vec3, v: &Vec3| u.x * v.x + u.y * v.y + u.z * v.z;
  let denominator = (dot(a, a) * dot(b, b)).sqrt();
  if denominator < ANGLE_EPSILON {
    return 0.;
  }

  let cos = clamp(dot(a, b) / denominator, -1., 1.);
  cos.acos().to_degrees()
}

#[derive(Clone)]
pub struct ErrorStack {
  pub errors: Vec<String>,
}

impl ErrorStack {
  #[cold]
  pub fn new(msg: impl Into<String>) -> Self {
    ErrorStack {
      errors: vec![msg.into()],
    }
  }

  #[cold]
  pub fn wrap(mut self, msg: impl Into<String>) -> Self {
    self.errors.push(msg.into());
    self
  }
}

impl Display for ErrorStack {
  #[cold]
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let indent = "  ";
    for (ix, err) in self.errors.iter().rev().enumerate() {
      let mut lines = err.lines().peekable();
      while let Some(line) = lines.next() {
        for _ in 0..ix {
          write!(f, "{indent}")?;
        }

        write!(f, "{line}")?;

        if lines.peek().is_some() {
          writeln!(f)?;
        }
      }

      if ix < self.errors.len() - 1 {
        writeln!(f)?;
      }
    }
    Ok(())
  }
}

impl Debug for ErrorStack {
  #[cold]
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{self}")
  }
}

impl std::error::Error for ErrorStack {}

#[cfg(test)]
mod tests {
  use rand::Rng;

  use super::*;

  #[test]
  fn test_angle_degrees_basic() {
    let x = Vec3::new(1., 0., 0.);
    let y = Vec3::new(0., 2., 0.);
    assert!((angle_degrees(&x, &y) - 90.).abs() < 1e-4);
    assert_eq!(angle_degrees(&x, &x), 0.);
    assert!(angle_degrees(&x, &(x * 3.)).abs() < 0.05);
    assert!((angle_degrees(&x, &-x) - 180.).abs() < 0.05);
  }

  #[test]
  fn test_angle_degrees_zero_vector() {
    let x = Vec3::new(1., 0., 0.);
    assert_eq!(angle_degrees(&x, &Vec3::zeros()), 0.);
    assert_eq!(angle_degrees(&Vec3::zeros(), &Vec3::zeros()), 0.);
  }

  #[test]
  fn test_error_stack_display() {
    let err = ErrorStack::new("inner problem").wrap("while loading config");
    assert_eq!(format!("{err}"), "while loading config\n  inner problem");
  }

  #[test]
  fn test_build_rng_is_deterministic() {
    let mut a = build_rng((7, 11));
    let mut b = build_rng((7, 11));
    for _ in 0..16 {
      assert_eq!(a.gen::<u32>(), b.gen::<u32>());
    }
  }
}
