use serde::{Deserialize, Serialize};

/// Side length of every rendered grid.
pub const FRAME_SIZE: usize = 64;

/// Number of palette entries; cell values are 4-bit color indices.
pub const PALETTE_SIZE: u8 = 16;

pub const COLOR_BLACK: u8 = 0;
pub const COLOR_RED: u8 = 8;
pub const COLOR_BLUE: u8 = 9;

/// One layer of color indices, indexed `grid[y][x]`.
pub type Grid = Vec<Vec<u8>>;

/// A rendered snapshot returned after every command. Serialized as a bare
/// array of layers (`[[[u8]]]`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame {
    pub layers: Vec<Grid>,
}

impl Frame {
    pub fn single(grid: Grid) -> Self {
        Self { layers: vec![grid] }
    }

    /// The top layer, if any.
    pub fn grid(&self) -> Option<&Grid> {
        self.layers.first()
    }
}

/// A `FRAME_SIZE` square grid filled with `color`.
pub fn blank_grid(color: u8) -> Grid {
    vec![vec![color; FRAME_SIZE]; FRAME_SIZE]
}

/// Pad or clip an arbitrary grid to `FRAME_SIZE` square, filling gaps with black
/// and masking values into the palette.
pub fn normalize_grid(grid: &[Vec<u8>]) -> Grid {
    (0..FRAME_SIZE)
        .map(|y| {
            (0..FRAME_SIZE)
                .map(|x| {
                    grid.get(y)
                        .and_then(|row| row.get(x))
                        .map_or(COLOR_BLACK, |&c| c % PALETTE_SIZE)
                })
                .collect()
        })
        .collect()
}
