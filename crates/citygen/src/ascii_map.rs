//! ASCII rendering of a generated chunk.
//!
//! One character per cell:
//! - `#` road
//! - `B` cell under a building placement
//! - `:` 1x1 filler
//! - `.` empty
//!
//! Built on demand from a `&Chunk`; handy for the headless runner and for
//! eyeballing layout changes in test output.

use crate::chunk::Chunk;
use crate::grid::CellKind;

/// Render the chunk at full resolution with row labels and a legend.
pub fn render_chunk(chunk: &Chunk) -> String {
    let tiles = chunk.grid.tiles;
    let cells = char_grid(chunk);

    let mut lines: Vec<String> = Vec::with_capacity(tiles + 4);
    lines.push(col_header(tiles));
    for z in 0..tiles {
        let mut line = format!("{z:>4} | ");
        line.extend(&cells[z * tiles..(z + 1) * tiles]);
        lines.push(line);
    }
    lines.push(String::new());
    lines.push("Legend:  #=Road  B=Building  :=Filler  .=Empty".to_string());
    lines.join("\n")
}

/// The raw character grid, row-major, no headers. Tests match against this.
pub fn char_grid(chunk: &Chunk) -> Vec<char> {
    let tiles = chunk.grid.tiles;
    let mut cells = vec!['.'; tiles * tiles];

    for z in 0..tiles {
        for x in 0..tiles {
            if chunk.grid.get(x, z) == CellKind::Way {
                cells[z * tiles + x] = '#';
            }
        }
    }
    for p in chunk.placements() {
        for z in p.z..p.z + p.span_z {
            for x in p.x..p.x + p.span_x {
                cells[z * tiles + x] = 'B';
            }
        }
    }
    for &(x, z) in &chunk.filler {
        cells[z * tiles + x] = ':';
    }
    cells
}

fn col_header(tiles: usize) -> String {
    let mut header = String::from("       ");
    let mut col = 0;
    while col < tiles {
        if col % 10 == 0 {
            let label = format!("{col}");
            header.push_str(&label);
            col += label.len();
        } else {
            header.push(' ');
            col += 1;
        }
    }
    header.trim_end().to_string()
}
