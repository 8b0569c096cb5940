//! Headless demo runner.
//!
//! Streams chunks around a moving focus for a fixed number of updates, then
//! prints the chunk under the focus as an ASCII map together with layout
//! stats. Seed and chunk size can be overridden from the environment:
//!
//! ```sh
//! INFINICITY_SEED=42 INFINICITY_TILES=32 cargo run -p infinicity
//! ```

use bevy::log::LogPlugin;
use bevy::prelude::*;

use citygen::ascii_map::render_chunk;
use citygen::{ChunkRegistry, CityGenPlugin, GenConfig, StreamingFocus};

const UPDATES: usize = 32;

fn main() {
    let mut config = GenConfig::default();
    if let Some(seed) = env_parse("INFINICITY_SEED") {
        config.seed = seed;
    }
    if let Some(tiles) = env_parse("INFINICITY_TILES") {
        config.chunk_tiles = tiles;
    }
    let chunk_world_size = config.chunk_world_size();

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default(), CityGenPlugin))
        .insert_resource(config);

    // Walk the focus diagonally across a few chunk borders so the streamer
    // exercises both loading and unloading.
    for step in 0..UPDATES {
        let offset = step as f32 * chunk_world_size * 0.25;
        app.world_mut().resource_mut::<StreamingFocus>().world_pos = Vec2::splat(offset);
        app.update();
    }

    report(&mut app, chunk_world_size);
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn report(app: &mut App, chunk_world_size: f32) {
    let focus = *app.world().resource::<StreamingFocus>();
    let registry = app.world().resource::<ChunkRegistry>();
    let index = citygen::grid::world_to_chunk(focus.world_pos.x, focus.world_pos.y, chunk_world_size);

    println!("resident chunks: {}", registry.len());
    let Some(chunk) = registry.get(index) else {
        println!("focus chunk {index} not resident");
        return;
    };

    println!("{}", render_chunk(chunk));
    println!(
        "chunk {index}: {} lots, {} buildings, {} cells built, {} filler cells",
        chunk.lots.len(),
        chunk.placements().count(),
        chunk.total_occupied_cells(),
        chunk.filler.len()
    );
}
