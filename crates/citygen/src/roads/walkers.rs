//! Random-walker road strategy.
//!
//! Independent agents wander the chunk in the four cardinal directions,
//! stamping path bands as they go. Each step a walker may turn 90 degrees
//! (turning bias) or spawn a branch walker at the current junction; walkers
//! reflect off the chunk border. Purely chunk-local: continuity across the
//! border comes from the arterial lattice, not from the walkers.

use bevy::math::IVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::GenConfig;
use crate::grid::{CellKind, ChunkGrid};
use crate::roads::RoadStrategy;

pub struct RandomWalkers;

/// Cardinal step vectors, indexed 0..4.
const DIRS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

#[derive(Debug, Clone, Copy)]
struct Walker {
    x: i64,
    z: i64,
    dir: usize,
    steps_left: usize,
}

impl RoadStrategy for RandomWalkers {
    fn carve(&self, grid: &mut ChunkGrid, rng: &mut ChaCha8Rng, config: &GenConfig, _index: IVec2) {
        let w = &config.walkers;
        let tiles = grid.tiles as i64;
        if w.count == 0 || w.steps == 0 {
            return;
        }
        // Branches share the budget of their ancestors; a hard cap keeps
        // pathological branch chances bounded.
        let max_walkers = w.count * 4;
        let mut spawned = w.count;

        let mut active: Vec<Walker> = (0..w.count)
            .map(|_| Walker {
                x: rng.gen_range(0..tiles),
                z: rng.gen_range(0..tiles),
                dir: rng.gen_range(0..4),
                steps_left: w.steps,
            })
            .collect();

        while let Some(mut walker) = active.pop() {
            while walker.steps_left > 0 {
                walker.steps_left -= 1;

                stamp_path(grid, walker.x, walker.z, w.path_width);

                if rng.gen::<f32>() < w.turn_chance {
                    walker.dir = turn(walker.dir, rng.gen_bool(0.5));
                }
                if spawned < max_walkers && rng.gen::<f32>() < w.branch_chance {
                    spawned += 1;
                    active.push(Walker {
                        dir: turn(walker.dir, rng.gen_bool(0.5)),
                        steps_left: walker.steps_left,
                        ..walker
                    });
                }

                let (dx, dz) = DIRS[walker.dir];
                let nx = walker.x + dx;
                let nz = walker.z + dz;
                if nx < 0 || nz < 0 || nx >= tiles || nz >= tiles {
                    // Reflect off the chunk border.
                    walker.dir = opposite(walker.dir);
                    continue;
                }
                walker.x = nx;
                walker.z = nz;
            }
        }
    }
}

/// Rotate a direction index 90 degrees left or right.
fn turn(dir: usize, clockwise: bool) -> usize {
    // DIRS order is +x, -x, +z, -z; map through explicit tables.
    const CW: [usize; 4] = [3, 2, 0, 1];
    const CCW: [usize; 4] = [2, 3, 1, 0];
    if clockwise {
        CW[dir]
    } else {
        CCW[dir]
    }
}

fn opposite(dir: usize) -> usize {
    dir ^ 1
}

/// Stamp a `width x width` block anchored at the walker position, clipped to
/// the chunk.
fn stamp_path(grid: &mut ChunkGrid, x: i64, z: i64, width: usize) {
    for dz in 0..width as i64 {
        for dx in 0..width as i64 {
            let px = x + dx;
            let pz = z + dz;
            if px >= 0 && pz >= 0 && (px as usize) < grid.tiles && (pz as usize) < grid.tiles {
                grid.set(px as usize, pz as usize, CellKind::Way);
            }
        }
    }
}
