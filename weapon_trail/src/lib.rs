//! Ribbon geometry for weapon trails.
//!
//! The host samples the two ends of a weapon every frame and feeds them to a [`WeaponTrail`],
//! which keeps a short history of those samples and fits a smooth, adaptively subdivided ribbon
//! through them.

pub mod catmull_rom;
pub mod config;
#[cfg(feature = "bindgen")]
pub mod interface;
pub mod mesh;
pub mod stickshot;
pub mod trail;

pub use self::{config::TrailConfig, mesh::TrailMesh, stickshot::Stickshot, trail::WeaponTrail};
