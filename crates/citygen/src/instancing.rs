//! Host-side realization hooks.
//!
//! The engine emits abstract layout (placements, filler cells); the host turns
//! those into meshes, prefabs, or instanced batches. These traits are the
//! seam: `GroundHeight` samples terrain so buildings sit on it, `Instancer`
//! receives one transform per placement and may decline any of them.

use bevy::math::Vec3;

use crate::chunk::Chunk;
use crate::packer::Placement;

/// Terrain height sampler. The engine itself is flat; the host projects the
/// layout onto its own terrain by implementing this.
pub trait GroundHeight {
    fn height_at(&self, x: f32, z: f32) -> f32;
}

/// The trivial sampler for a flat world at a fixed elevation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGround(pub f32);

impl GroundHeight for FlatGround {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.0
    }
}

/// World-space description of one building instance, handed to the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingInstance {
    /// Template id chosen by the packer.
    pub template: u32,
    /// Footprint center, ground-sampled on the y axis.
    pub center: Vec3,
    /// Footprint extents in world units (x and z spans after rotation).
    pub extents: Vec3,
    pub rotated: bool,
}

/// Receives building instances for one chunk. Returning `None` skips the
/// instance (the host may cull, budget, or reject templates it cannot load);
/// the engine does not retry skipped instances.
pub trait Instancer {
    type Handle;

    fn place(&mut self, instance: &BuildingInstance) -> Option<Self::Handle>;
}

/// Push every placement of a generated chunk through the instancer, returning
/// the handles of the instances the host accepted.
pub fn realize_chunk<I: Instancer>(
    chunk: &Chunk,
    ground: &dyn GroundHeight,
    instancer: &mut I,
) -> Vec<I::Handle> {
    let mut handles = Vec::new();
    for p in chunk.placements() {
        let instance = instance_for(chunk, ground, p);
        if let Some(handle) = instancer.place(&instance) {
            handles.push(handle);
        }
    }
    handles
}

fn instance_for(chunk: &Chunk, ground: &dyn GroundHeight, p: &Placement) -> BuildingInstance {
    let (center, size) = chunk.placement_rect_world(p);
    BuildingInstance {
        template: p.template,
        center: Vec3::new(center.x, ground.height_at(center.x, center.y), center.y),
        extents: Vec3::new(size.x, 0.0, size.y),
        rotated: p.rotated,
    }
}
