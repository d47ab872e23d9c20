use common::ErrorStack;
use nanoserde::DeJson;

pub const MIN_DEGREE_RESOLUTION: f32 = 1.;
/// Upper end of the range that's useful in practice.  Coarser resolutions are accepted but make
/// fast swings visibly polygonal.
pub const MAX_RECOMMENDED_DEGREE_RESOLUTION: f32 = 30.;

/// Tunables for a weapon trail.  Out-of-range values are clamped rather than rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailConfig {
  /// How long, in seconds, a stickshot stays part of the trail
  duration: f32,
  /// Maximum angle, in degrees, that a single subdivision of a segment is allowed to turn or
  /// twist before another one is added
  degree_resolution: f32,
}

#[derive(DeJson)]
struct SerializedTrailConfig {
  duration: Option<f32>,
  degree_resolution: Option<f32>,
}

impl Default for TrailConfig {
  fn default() -> Self {
    TrailConfig {
      duration: 0.,
      degree_resolution: MIN_DEGREE_RESOLUTION,
    }
  }
}

impl TrailConfig {
  pub fn new(duration: f32, degree_resolution: f32) -> Self {
    let mut config = TrailConfig::default();
    config.set_duration(duration);
    config.set_degree_resolution(degree_resolution);
    config
  }

  /// Parses a config like `{"duration": 0.25, "degree_resolution": 10.0}`.  Missing fields keep
  /// their defaults.
  pub fn from_json(json: &str) -> Result<Self, ErrorStack> {
    let serialized = SerializedTrailConfig::deserialize_json(json).map_err(|err| {
      ErrorStack::new(format!("{err:?}")).wrap("Failed to parse weapon trail config")
    })?;

    let mut config = TrailConfig::default();
    if let Some(duration) = serialized.duration {
      config.set_duration(duration);
    }
    if let Some(degree_resolution) = serialized.degree_resolution {
      config.set_degree_resolution(degree_resolution);
    }
    Ok(config)
  }

  #[inline]
  pub fn duration(&self) -> f32 {
    self.duration
  }

  #[inline]
  pub fn degree_resolution(&self) -> f32 {
    self.degree_resolution
  }

  pub fn set_duration(&mut self, duration: f32) {
    // `max` also maps NaN to 0
    self.duration = duration.max(0.);
  }

  pub fn set_degree_resolution(&mut self, degree_resolution: f32) {
    if degree_resolution > MAX_RECOMMENDED_DEGREE_RESOLUTION {
      log::warn!(
        "Weapon trail degree resolution of {degree_resolution} is coarser than the recommended \
         maximum of {MAX_RECOMMENDED_DEGREE_RESOLUTION}"
      );
    }
    self.degree_resolution = degree_resolution.max(MIN_DEGREE_RESOLUTION);
  }

  /// Upper bound on the number of cross-sections the trail can have with `stickshot_count`
  /// stickshots.  The steepest possible segment turns by 180 degrees.
  pub fn max_cross_section_count(&self, stickshot_count: usize) -> usize {
    if stickshot_count < 2 {
      return stickshot_count;
    }

    let per_segment = (180. / self.degree_resolution).ceil() as usize + 1;
    (stickshot_count - 1) * per_segment + 1
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_new_clamps() {
    let config = TrailConfig::new(-1., 0.25);
    assert_eq!(config.duration(), 0.);
    assert_eq!(config.degree_resolution(), MIN_DEGREE_RESOLUTION);

    let config = TrailConfig::new(0.3, 12.);
    assert_eq!(config.duration(), 0.3);
    assert_eq!(config.degree_resolution(), 12.);
  }

  #[test]
  fn test_setters_clamp() {
    let mut config = TrailConfig::default();
    config.set_duration(f32::NAN);
    assert_eq!(config.duration(), 0.);
    config.set_degree_resolution(-30.);
    assert_eq!(config.degree_resolution(), 1.);
    // coarse resolutions are accepted as-is
    config.set_degree_resolution(45.);
    assert_eq!(config.degree_resolution(), 45.);
  }

  #[test]
  fn test_from_json() {
    let config =
      TrailConfig::from_json(r#"{"duration": 0.5, "degree_resolution": 10.0}"#).unwrap();
    assert_eq!(config, TrailConfig::new(0.5, 10.));

    let config =
      TrailConfig::from_json(r#"{"duration": -2.0, "degree_resolution": 0.5}"#).unwrap();
    assert_eq!(config, TrailConfig::default());

    let config = TrailConfig::from_json(r#"{"degree_resolution": 5.0}"#).unwrap();
    assert_eq!(config.duration(), 0.);
    assert_eq!(config.degree_resolution(), 5.);
  }

  #[test]
  fn test_from_json_malformed() {
    let err = TrailConfig::from_json(r#"{"duration": "#).unwrap_err();
    assert!(format!("{err}").starts_with("Failed to parse weapon trail config"));
  }

  #[test]
  fn test_max_cross_section_count() {
    let config = TrailConfig::new(1., 10.);
    assert_eq!(config.max_cross_section_count(0), 0);
    assert_eq!(config.max_cross_section_count(1), 1);
    assert_eq!(config.max_cross_section_count(3), 2 * 19 + 1);
  }
}
