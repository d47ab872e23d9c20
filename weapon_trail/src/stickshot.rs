use common::Vec3;

/// Position of the tracked stick at a single instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stickshot {
  timestamp: f32,
  top: Vec3,
  bottom: Vec3,
}

impl Stickshot {
  pub const fn new(timestamp: f32, top: Vec3, bottom: Vec3) -> Self {
    Stickshot {
      timestamp,
      top,
      bottom,
    }
  }

  #[inline]
  pub fn timestamp(&self) -> f32 {
    self.timestamp
  }

  #[inline]
  pub fn top(&self) -> Vec3 {
    self.top
  }

  #[inline]
  pub fn bottom(&self) -> Vec3 {
    self.bottom
  }

  /// Midpoint of the stick
  #[inline]
  pub fn center(&self) -> Vec3 {
    (self.top + self.bottom) * 0.5
  }

  /// Half of the stick, pointing from the center towards the top
  #[inline]
  pub fn radius(&self) -> Vec3 {
    (self.top - self.bottom) * 0.5
  }

  /// Returns `true` once `duration` seconds or more have passed since this stickshot was taken.
  #[inline]
  pub fn is_expired(&self, now: f32, duration: f32) -> bool {
    self.timestamp + duration <= now
  }
}
