use common::Vec3;
use wasm_bindgen::prelude::*;

use crate::{TrailConfig, TrailMesh, WeaponTrail};

static mut DID_INIT: bool = false;

fn maybe_init() {
  unsafe {
    if DID_INIT {
      return;
    }
    DID_INIT = true;
  }

  console_error_panic_hook::set_once();
  wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
}

pub struct WeaponTrailCtx {
  trail: WeaponTrail,
}

impl WeaponTrailCtx {
  fn new(duration: f32, degree_resolution: f32) -> Self {
    WeaponTrailCtx {
      trail: WeaponTrail::new(TrailConfig::new(duration, degree_resolution)),
    }
  }

  fn set_config_json(&mut self, json: &str) -> bool {
    match TrailConfig::from_json(json) {
      Ok(config) => {
        self.trail.set_config(config);
        true
      },
      Err(err) => {
        log::error!("{err}");
        false
      },
    }
  }

  fn tick(&mut self, now: f32, top: Vec3, bottom: Vec3) -> bool {
    self.trail.tick(now, top, bottom).is_some()
  }

  fn with_mesh<T: Default>(&self, f: impl FnOnce(&TrailMesh) -> T) -> T {
    self.trail.mesh().map(f).unwrap_or_default()
  }
}

#[wasm_bindgen]
pub fn create_weapon_trail_ctx(duration: f32, degree_resolution: f32) -> *mut WeaponTrailCtx {
  maybe_init();

  let ctx = Box::new(WeaponTrailCtx::new(duration, degree_resolution));
  Box::into_raw(ctx)
}

#[wasm_bindgen]
pub fn weapon_trail_ctx_free(ctx: *mut WeaponTrailCtx) {
  let mut ctx = unsafe { Box::from_raw(ctx) };
  ctx.trail.teardown();
  drop(ctx);
}

/// Returns `false` and leaves the current config untouched if `json` can't be parsed.
#[wasm_bindgen]
pub fn weapon_trail_ctx_set_config_json(ctx: *mut WeaponTrailCtx, json: &str) -> bool {
  let ctx = unsafe { &mut *ctx };
  ctx.set_config_json(json)
}

/// Returns `true` if a mesh was built and can be read out with the getters below.
#[wasm_bindgen]
pub fn weapon_trail_ctx_tick(
  ctx: *mut WeaponTrailCtx,
  now: f32,
  top_x: f32,
  top_y: f32,
  top_z: f32,
  bottom_x: f32,
  bottom_y: f32,
  bottom_z: f32,
) -> bool {
  let ctx = unsafe { &mut *ctx };
  ctx.tick(
    now,
    Vec3::new(top_x, top_y, top_z),
    Vec3::new(bottom_x, bottom_y, bottom_z),
  )
}

#[wasm_bindgen]
pub fn weapon_trail_ctx_get_vertices(ctx: *const WeaponTrailCtx) -> Vec<f32> {
  let ctx = unsafe { &*ctx };
  ctx.with_mesh(|mesh| mesh.vertices_flat().to_owned())
}

#[wasm_bindgen]
pub fn weapon_trail_ctx_get_indices(ctx: *const WeaponTrailCtx) -> Vec<u32> {
  let ctx = unsafe { &*ctx };
  ctx.with_mesh(|mesh| mesh.indices.clone())
}

#[wasm_bindgen]
pub fn weapon_trail_ctx_get_uvs(ctx: *const WeaponTrailCtx) -> Vec<f32> {
  let ctx = unsafe { &*ctx };
  ctx.with_mesh(|mesh| mesh.uvs_flat().to_owned())
}

#[wasm_bindgen]
pub fn weapon_trail_ctx_reset(ctx: *mut WeaponTrailCtx) {
  let ctx = unsafe { &mut *ctx };
  ctx.trail.reset();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ctx_round_trip() {
    let ctx = Box::into_raw(Box::new(WeaponTrailCtx::new(1., 10.)));

    assert!(!weapon_trail_ctx_tick(ctx, 0., 0., 1., 0., 0., -1., 0.));
    assert!(weapon_trail_ctx_get_vertices(ctx).is_empty());

    assert!(weapon_trail_ctx_tick(ctx, 0.1, 1., 1., 0., 1., -1., 0.));
    let vertices = weapon_trail_ctx_get_vertices(ctx);
    assert_eq!(vertices.len(), 2 * 3 * 3);
    assert_eq!(&vertices[..3], &[0., -1., 0.]);
    assert_eq!(weapon_trail_ctx_get_indices(ctx).len(), 12);
    assert_eq!(weapon_trail_ctx_get_uvs(ctx).len(), 2 * 3 * 2);

    weapon_trail_ctx_reset(ctx);
    assert!(weapon_trail_ctx_get_indices(ctx).is_empty());
    assert!(!weapon_trail_ctx_tick(ctx, 0.2, 0., 1., 0., 0., -1., 0.));

    weapon_trail_ctx_free(ctx);
  }

  #[test]
  fn test_set_config_json() {
    let mut ctx = WeaponTrailCtx::new(1., 10.);
    assert!(ctx.set_config_json(r#"{"duration": 0.25, "degree_resolution": 5.0}"#));
    assert_eq!(ctx.trail.config(), &TrailConfig::new(0.25, 5.));

    assert!(!ctx.set_config_json("not json"));
    assert_eq!(ctx.trail.config(), &TrailConfig::new(0.25, 5.));
  }
}
