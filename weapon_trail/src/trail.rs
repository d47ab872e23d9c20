use common::{angle_degrees, RingBuffer, Vec3};

use crate::{catmull_rom, config::TrailConfig, mesh::TrailMesh, stickshot::Stickshot};

/// Builds a ribbon mesh that trails behind a moving stick.
///
/// Every frame the host calls [`WeaponTrail::tick`] with the current positions of the two ends of
/// the stick.  Stickshots older than the configured duration are dropped, and a smooth ribbon is
/// fit through the ones that remain.
#[derive(Debug)]
pub struct WeaponTrail {
  stickshots: RingBuffer<Stickshot>,
  config: TrailConfig,
  /// Created the first time there's enough history to build a ribbon, and reused from then on
  /// until `teardown`.
  mesh: Option<TrailMesh>,
}

impl Default for WeaponTrail {
  fn default() -> Self {
    WeaponTrail::new(TrailConfig::default())
  }
}

/// Largest angle, in degrees, that the segment between `p0` and `p1` turns or twists through.
///
/// Turning is the angle between the chords `c0 -> p1` and `p0 -> c1`, which approximates the
/// difference between the curve's tangents at either end.  Twisting is the rotation of the stick
/// itself between the two stickshots.
pub fn segment_deviation_degrees(
  c0: &Stickshot,
  p0: &Stickshot,
  p1: &Stickshot,
  c1: &Stickshot,
) -> f32 {
  let turn = angle_degrees(
    &(p1.center() - c0.center()),
    &(c1.center() - p0.center()),
  );
  let twist = angle_degrees(&p0.radius(), &p1.radius());
  turn.max(twist)
}

/// Number of cross-sections to emit for a segment, counting the one at its start.
pub fn interpolation_count(deviation_degrees: f32, degree_resolution: f32) -> usize {
  // NaN deviations saturate to 0 here and fall back to a straight segment
  (deviation_degrees / degree_resolution).ceil() as usize + 1
}

fn push_stickshot_cross_section(mesh: &mut TrailMesh, stickshot: &Stickshot) {
  mesh.push_cross_section(stickshot.center(), stickshot.radius());
}

/// Fills `mesh` with the cross-sections for all segments of `stickshots`.  Needs at least two
/// stickshots.
fn build_cross_sections(
  stickshots: &RingBuffer<Stickshot>,
  degree_resolution: f32,
  mesh: &mut TrailMesh,
) {
  let count = stickshots.len();

  for i in 0..count - 1 {
    let p0 = stickshots[i];
    let p1 = stickshots[i + 1];
    // the first and last segments use their own endpoints as the outer control points
    let c0 = if i > 0 { stickshots[i - 1] } else { p0 };
    let c1 = if i + 2 < count {
      stickshots[i + 2]
    } else {
      p1
    };

    let deviation = segment_deviation_degrees(&c0, &p0, &p1, &c1);
    let interpolations = interpolation_count(deviation, degree_resolution);
    if interpolations <= 1 {
      push_stickshot_cross_section(mesh, &p0);
      continue;
    }

    let centers = catmull_rom::sample_segment(
      c0.center(),
      p0.center(),
      p1.center(),
      c1.center(),
      interpolations,
    );
    let radii = catmull_rom::sample_segment(
      c0.radius(),
      p0.radius(),
      p1.radius(),
      c1.radius(),
      interpolations,
    );
    for (center, radius) in centers.zip(radii) {
      mesh.push_cross_section(center, radius);
    }
  }

  // the segments only cover `t` in [0, 1), so the newest stickshot closes off the ribbon
  push_stickshot_cross_section(mesh, &stickshots[count - 1]);
}

impl WeaponTrail {
  pub fn new(config: TrailConfig) -> Self {
    WeaponTrail {
      stickshots: RingBuffer::new(0),
      config,
      mesh: None,
    }
  }

  pub fn config(&self) -> &TrailConfig {
    &self.config
  }

  pub fn set_config(&mut self, config: TrailConfig) {
    self.config = config;
  }

  pub fn set_duration(&mut self, duration: f32) {
    self.config.set_duration(duration);
  }

  pub fn set_degree_resolution(&mut self, degree_resolution: f32) {
    self.config.set_degree_resolution(degree_resolution);
  }

  pub fn history(&self) -> &RingBuffer<Stickshot> {
    &self.stickshots
  }

  pub fn stickshot_count(&self) -> usize {
    self.stickshots.len()
  }

  /// Appends a stickshot as-is, without evicting anything.  Stickshots are expected to be pushed
  /// in timestamp order.
  pub fn push_stickshot(&mut self, stickshot: Stickshot) {
    self.stickshots.push_back(stickshot);
  }

  /// The ribbon built by the last `tick`, if it produced one.
  pub fn mesh(&self) -> Option<&TrailMesh> {
    self.mesh.as_ref().filter(|mesh| !mesh.is_empty())
  }

  /// Drops stickshots that have been around for `duration` or longer.  Returns how many were
  /// dropped.
  fn evict_expired(&mut self, now: f32) -> usize {
    let duration = self.config.duration();
    let mut evicted_count = 0;
    while self
      .stickshots
      .front()
      .is_some_and(|oldest| oldest.is_expired(now, duration))
    {
      if self.stickshots.pop_front().is_err() {
        break;
      }
      evicted_count += 1;
    }
    evicted_count
  }

  /// Records the stick's current position and rebuilds the ribbon.
  ///
  /// Returns `None` if there aren't yet at least two stickshots in the trail; the host should
  /// hide whatever it drew previously in that case.  The returned mesh is only valid until the
  /// next call that mutates the trail.
  pub fn tick(&mut self, now: f32, top: Vec3, bottom: Vec3) -> Option<&TrailMesh> {
    let evicted_count = self.evict_expired(now);
    self.stickshots.push_back(Stickshot::new(now, top, bottom));

    if self.stickshots.len() < 2 {
      if let Some(mesh) = &mut self.mesh {
        mesh.clear();
      }
      return None;
    }

    let mesh = self.mesh.get_or_insert_with(TrailMesh::default);
    mesh.clear();
    mesh.reserve_cross_sections(self.config.max_cross_section_count(self.stickshots.len()));
    build_cross_sections(&self.stickshots, self.config.degree_resolution(), mesh);
    mesh.finish();

    log::trace!(
      "Built weapon trail at t={now}: evicted {evicted_count} stickshots, {} remaining, {} \
       cross-sections",
      self.stickshots.len(),
      mesh.cross_section_count()
    );
    if log::log_enabled!(log::Level::Warn) {
      let non_finite_count = mesh.non_finite_vertex_count();
      if non_finite_count > 0 {
        log::warn!(
          "Weapon trail mesh contains {non_finite_count} non-finite vertices out of {}",
          mesh.vertices.len()
        );
      }
    }

    Some(&*mesh)
  }

  /// Forgets all recorded stickshots, so that the next `tick` starts a new trail.  Called when the
  /// trail is disabled.
  pub fn reset(&mut self) {
    self.stickshots.clear();
    if let Some(mesh) = &mut self.mesh {
      mesh.clear();
    }
  }

  /// Resets the trail and releases the mesh buffers.
  pub fn teardown(&mut self) {
    self.stickshots.clear();
    self.mesh = None;
  }
}
