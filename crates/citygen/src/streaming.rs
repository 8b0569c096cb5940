//! Chunk streaming.
//!
//! Keeps the square of chunks around the observer resident. Missing in-range
//! chunks are generated (a bounded number per update to cap frame cost);
//! out-of-range chunks are dropped immediately. Dropping a chunk discards all
//! of its derived state, so re-entering the area regenerates an identical
//! layout from the seed.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::chunk::{generate_chunk, Chunk};
use crate::config::GenConfig;
use crate::grid::world_to_chunk;
use crate::packer::FootprintCatalog;

/// All currently resident chunks, keyed by chunk index.
#[derive(Resource, Default)]
pub struct ChunkRegistry {
    pub chunks: HashMap<IVec2, Chunk>,
}

impl ChunkRegistry {
    pub fn get(&self, index: IVec2) -> Option<&Chunk> {
        self.chunks.get(&index)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// World-space position the streamer centers on. The host moves this; a game
/// would sync it from the camera every frame.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct StreamingFocus {
    pub world_pos: Vec2,
}

#[derive(Resource, Debug, Clone)]
pub struct StreamingConfig {
    /// Chunks stay resident within this Chebyshev radius of the focus chunk,
    /// so (2r + 1)^2 chunks when fully loaded.
    pub active_range: i32,
    /// Upper bound on chunk generations per update. Remaining in-range chunks
    /// are picked up on later updates.
    pub chunks_per_update: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            active_range: 3,
            chunks_per_update: 2,
        }
    }
}

/// Load missing in-range chunks and unload everything else.
pub fn stream_chunks(
    mut registry: ResMut<ChunkRegistry>,
    focus: Res<StreamingFocus>,
    streaming: Res<StreamingConfig>,
    config: Res<GenConfig>,
    catalog: Res<FootprintCatalog>,
) {
    let center = world_to_chunk(
        focus.world_pos.x,
        focus.world_pos.y,
        config.chunk_world_size(),
    );
    let r = streaming.active_range;

    let stale: Vec<IVec2> = registry
        .chunks
        .keys()
        .filter(|index| (**index - center).abs().max_element() > r)
        .copied()
        .collect();
    for index in stale {
        registry.chunks.remove(&index);
        debug!("unloaded chunk {index}");
    }

    let mut budget = streaming.chunks_per_update;
    // Ring order from the center outwards so the nearest chunks come up first.
    for dz in -r..=r {
        for dx in -r..=r {
            if budget == 0 {
                return;
            }
            let index = center + IVec2::new(dx, dz);
            if registry.chunks.contains_key(&index) {
                continue;
            }
            let chunk = generate_chunk(index, &config, &catalog);
            info!(
                "loaded chunk {index}: {} lots, {} buildings",
                chunk.lots.len(),
                chunk.placements().count()
            );
            registry.chunks.insert(index, chunk);
            budget -= 1;
        }
    }
}
