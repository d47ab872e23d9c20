use common::{Vec2, Vec3};

/// Each cross-section of the ribbon is made of three vertices: bottom edge, center, and top edge.
pub const CROSS_SECTION_VERTEX_COUNT: usize = 3;
/// Two quads (bottom->center and center->top) of two triangles each between every pair of
/// consecutive cross-sections.
pub const INDICES_PER_SEGMENT: usize = (CROSS_SECTION_VERTEX_COUNT - 1) * 6;

const CROSS_SECTION_V: [f32; CROSS_SECTION_VERTEX_COUNT] = [0., 0.5, 1.];

/// Vertex, index, and UV buffers for a trail ribbon.
///
/// Cross-sections are stored oldest first.  The buffers are rebuilt from scratch every frame, but
/// their allocations are reused.
#[derive(Clone, Debug, Default)]
pub struct TrailMesh {
  pub vertices: Vec<Vec3>,
  pub indices: Vec<u32>,
  pub uvs: Vec<Vec2>,
}

impl TrailMesh {
  pub fn clear(&mut self) {
    self.vertices.clear();
    self.indices.clear();
    self.uvs.clear();
  }

  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  pub fn reserve_cross_sections(&mut self, count: usize) {
    let vtx_count = count * CROSS_SECTION_VERTEX_COUNT;
    self.vertices.reserve(vtx_count);
    self.uvs.reserve(vtx_count);
    self
      .indices
      .reserve(count.saturating_sub(1) * INDICES_PER_SEGMENT);
  }

  pub fn push_cross_section(&mut self, center: Vec3, radius: Vec3) {
    self.vertices.push(center - radius);
    self.vertices.push(center);
    self.vertices.push(center + radius);
  }

  pub fn cross_section_count(&self) -> usize {
    self.vertices.len() / CROSS_SECTION_VERTEX_COUNT
  }

  /// Generates indices and UVs for the cross-sections that have been pushed so far.
  ///
  /// U runs from 1 at the oldest cross-section to 0 at the newest; V is 0 along the bottom edge,
  /// 0.5 along the center, and 1 along the top edge.
  pub fn finish(&mut self) {
    self.indices.clear();
    self.uvs.clear();

    let cross_section_count = self.cross_section_count();
    if cross_section_count < 2 {
      return;
    }
    let segment_count = cross_section_count - 1;

    self.indices.reserve(segment_count * INDICES_PER_SEGMENT);
    for i in 0..segment_count {
      let left = (i * CROSS_SECTION_VERTEX_COUNT) as u32;
      let right = ((i + 1) * CROSS_SECTION_VERTEX_COUNT) as u32;
      let [left_bottom, left_center, left_top] = [left, left + 1, left + 2];
      let [right_bottom, right_center, right_top] = [right, right + 1, right + 2];

      self.indices.extend_from_slice(&[
        left_bottom,
        left_center,
        right_center,
        right_center,
        right_bottom,
        left_bottom,
      ]);
      self.indices.extend_from_slice(&[
        left_center,
        left_top,
        right_top,
        right_top,
        right_center,
        left_center,
      ]);
    }

    self.uvs.reserve(self.vertices.len());
    for i in 0..cross_section_count {
      let u = 1. - i as f32 / segment_count as f32;
      for v in CROSS_SECTION_V {
        self.uvs.push(Vec2::new(u, v));
      }
    }
  }

  /// Vertex positions as a flat `[x, y, z, x, y, z, ...]` slice
  pub fn vertices_flat(&self) -> &[f32] {
    // `Vector3<f32>` is `repr(C)` over `[f32; 3]`
    unsafe {
      std::slice::from_raw_parts(
        self.vertices.as_ptr() as *const f32,
        self.vertices.len() * 3,
      )
    }
  }

  /// UVs as a flat `[u, v, u, v, ...]` slice
  pub fn uvs_flat(&self) -> &[f32] {
    unsafe { std::slice::from_raw_parts(self.uvs.as_ptr() as *const f32, self.uvs.len() * 2) }
  }

  pub fn non_finite_vertex_count(&self) -> usize {
    self
      .vertices
      .iter()
      .filter(|v| !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()))
      .count()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_two_cross_sections() {
    let mut mesh = TrailMesh::default();
    mesh.push_cross_section(Vec3::new(0., 0., 0.), Vec3::new(0., 1., 0.));
    mesh.push_cross_section(Vec3::new(1., 0., 0.), Vec3::new(0., 1., 0.));
    mesh.finish();

    assert_eq!(mesh.cross_section_count(), 2);
    assert_eq!(
      mesh.vertices,
      vec![
        Vec3::new(0., -1., 0.),
        Vec3::new(0., 0., 0.),
        Vec3::new(0., 1., 0.),
        Vec3::new(1., -1., 0.),
        Vec3::new(1., 0., 0.),
        Vec3::new(1., 1., 0.),
      ]
    );
    assert_eq!(mesh.indices, vec![0, 1, 4, 4, 3, 0, 1, 2, 5, 5, 4, 1]);
    assert_eq!(
      mesh.uvs,
      vec![
        Vec2::new(1., 0.),
        Vec2::new(1., 0.5),
        Vec2::new(1., 1.),
        Vec2::new(0., 0.),
        Vec2::new(0., 0.5),
        Vec2::new(0., 1.),
      ]
    );
  }

  #[test]
  fn test_u_decreases_towards_newest() {
    let mut mesh = TrailMesh::default();
    for i in 0..5 {
      mesh.push_cross_section(Vec3::new(i as f32, 0., 0.), Vec3::new(0., 0.5, 0.));
    }
    mesh.finish();

    assert_eq!(mesh.indices.len(), 4 * INDICES_PER_SEGMENT);
    assert_eq!(mesh.uvs.len(), mesh.vertices.len());
    let us: Vec<f32> = mesh
      .uvs
      .iter()
      .step_by(CROSS_SECTION_VERTEX_COUNT)
      .map(|uv| uv.x)
      .collect();
    assert_eq!(us, vec![1., 0.75, 0.5, 0.25, 0.]);
    assert!(mesh.indices.iter().all(|&ix| (ix as usize) < mesh.vertices.len()));
  }

  #[test]
  fn test_triangles_face_consistently() {
    // every triangle of a flat ribbon in the XY plane should have the same facing
    let mut mesh = TrailMesh::default();
    for i in 0..4 {
      mesh.push_cross_section(Vec3::new(i as f32, 0., 0.), Vec3::new(0., 1., 0.));
    }
    mesh.finish();

    for tri in mesh.indices.chunks_exact(3) {
      let [a, b, c] = [0, 1, 2].map(|i| mesh.vertices[tri[i] as usize]);
      let normal = (b - a).cross(&(c - a));
      assert!(normal.z < 0., "triangle {tri:?} faces the wrong way");
    }
  }

  #[test]
  fn test_finish_is_idempotent_and_clear_resets() {
    let mut mesh = TrailMesh::default();
    mesh.reserve_cross_sections(3);
    for i in 0..3 {
      mesh.push_cross_section(Vec3::new(0., 0., i as f32), Vec3::new(1., 0., 0.));
    }
    mesh.finish();
    let indices = mesh.indices.clone();
    mesh.finish();
    assert_eq!(mesh.indices, indices);
    assert_eq!(mesh.vertices_flat().len(), 27);
    assert_eq!(mesh.uvs_flat().len(), 18);
    assert_eq!(&mesh.vertices_flat()[..3], &[-1., 0., 0.]);

    mesh.clear();
    assert!(mesh.is_empty());
    assert!(mesh.indices.is_empty());
    assert!(mesh.uvs.is_empty());
  }

  #[test]
  fn test_single_cross_section_has_no_triangles() {
    let mut mesh = TrailMesh::default();
    mesh.push_cross_section(Vec3::zeros(), Vec3::new(0., 1., 0.));
    mesh.finish();
    assert!(mesh.indices.is_empty());
    assert!(mesh.uvs.is_empty());
  }

  #[test]
  fn test_non_finite_vertex_count() {
    let mut mesh = TrailMesh::default();
    mesh.push_cross_section(Vec3::zeros(), Vec3::new(f32::NAN, 0., 0.));
    mesh.push_cross_section(Vec3::zeros(), Vec3::new(0., 1., 0.));
    // the center vertex of the first cross-section stays finite
    assert_eq!(mesh.non_finite_vertex_count(), 2);
  }
}
