/// Side length of each block in cells.
pub const BLOCK_SIZE: u32 = 12;
/// Empty cells between neighbouring blocks.
pub const BLOCK_GAP: u32 = 4;
/// Top-left corner of the first block.
pub const ORIGIN_X: u32 = 4;
pub const ORIGIN_Y: u32 = 10;

/// Number of blocks on the board (3x3 without the centre).
pub const BLOCK_COUNT: usize = 8;

/// An inclusive rectangle of cells covered by one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// 1-based position in the 3x3 reading order (1..=9, never 5).
    pub number: u8,
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Block {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.x1..=self.x2).contains(&x) && (self.y1..=self.y2).contains(&y)
    }

    /// Edge-centre blocks (2, 4, 6, 8) must end red; corners stay blue.
    pub fn should_be_red(&self) -> bool {
        self.number % 2 == 0
    }
}

/// All blocks in reading order.
pub fn blocks() -> [Block; BLOCK_COUNT] {
    let mut out = [Block {
        number: 0,
        x1: 0,
        y1: 0,
        x2: 0,
        y2: 0,
    }; BLOCK_COUNT];
    let mut i = 0;
    for row in 0..3u32 {
        for col in 0..3u32 {
            let number = (row * 3 + col + 1) as u8;
            if number == 5 {
                continue;
            }
            let x1 = ORIGIN_X + col * (BLOCK_SIZE + BLOCK_GAP);
            let y1 = ORIGIN_Y + row * (BLOCK_SIZE + BLOCK_GAP);
            out[i] = Block {
                number,
                x1,
                y1,
                x2: x1 + BLOCK_SIZE - 1,
                y2: y1 + BLOCK_SIZE - 1,
            };
            i += 1;
        }
    }
    out
}

/// Index into [`blocks`] of the block covering `(x, y)`, if any.
pub fn block_at(x: u32, y: u32) -> Option<usize> {
    blocks().iter().position(|b| b.contains(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_skips_centre() {
        let numbers: Vec<u8> = blocks().iter().map(|b| b.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn edge_centre_blocks_match_known_coordinates() {
        let all = blocks();
        let b2 = all.iter().find(|b| b.number == 2).unwrap();
        assert_eq!((b2.x1, b2.y1, b2.x2, b2.y2), (20, 10, 31, 21));
        let b8 = all.iter().find(|b| b.number == 8).unwrap();
        assert_eq!((b8.x1, b8.y1, b8.x2, b8.y2), (20, 42, 31, 53));
    }

    #[test]
    fn gaps_and_centre_are_empty() {
        // Gap between block 1 and 2
        assert_eq!(block_at(17, 12), None);
        // Centre of the board
        assert_eq!(block_at(25, 30), None);
        // Above the first row
        assert_eq!(block_at(5, 0), None);
    }

    #[test]
    fn block_at_finds_corners() {
        assert_eq!(block_at(4, 10), Some(0));
        assert_eq!(block_at(15, 21), Some(0));
        assert_eq!(block_at(47, 53), Some(BLOCK_COUNT - 1));
    }
}
