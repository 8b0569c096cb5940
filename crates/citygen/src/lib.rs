//! Deterministic chunk-based city layout generation.
//!
//! The engine turns `(seed, chunk index, config)` into a road grid, lots,
//! and building placements. Chunks are fully independent: the same inputs
//! always reproduce the same layout, and seam continuity across chunk
//! borders comes from the global arterial lattice rather than from any
//! cross-chunk communication.

use bevy::prelude::*;

pub mod ascii_map;
pub mod chunk;
pub mod chunk_rng;
pub mod config;
pub mod gap_fill;
pub mod grid;
pub mod instancing;
pub mod lots;
pub mod packer;
pub mod roads;
pub mod streaming;

pub use chunk::{generate_chunk, Chunk};
pub use config::GenConfig;
pub use packer::{FootprintCatalog, Placement};
pub use streaming::{ChunkRegistry, StreamingConfig, StreamingFocus};


/// Validate the generation parameters before any chunk is built. A bad
/// config is a host programming error, so this aborts with the full
/// diagnostic rather than generating garbage layouts.
fn validate_config(config: Res<GenConfig>, catalog: Res<FootprintCatalog>) {
    if let Err(err) = config.validate() {
        panic!("invalid generation config: {err}");
    }
    if let Err(err) = catalog.validate() {
        panic!("invalid footprint catalog: {err}");
    }
    info!(
        "city generation ready: seed {}, {} tile chunks, {} footprint options",
        config.seed,
        config.chunk_tiles,
        catalog.options.len()
    );
}

pub struct CityGenPlugin;

impl Plugin for CityGenPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GenConfig>()
            .init_resource::<FootprintCatalog>()
            .init_resource::<StreamingConfig>()
            .init_resource::<StreamingFocus>()
            .init_resource::<ChunkRegistry>()
            .add_systems(Startup, validate_config)
            .add_systems(Update, streaming::stream_chunks);
    }
}
