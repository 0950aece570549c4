use crate::layout::{BLOCK_COUNT, blocks};

/// Number of blocks currently in their target color.
///
/// Scoring rules:
/// - Edge-centre block (2, 4, 6, 8) that is red: +1
/// - Corner block (1, 3, 7, 9) that is blue: +1
pub fn correct_blocks(red: &[bool; BLOCK_COUNT]) -> u32 {
    blocks()
        .iter()
        .zip(red.iter())
        .filter(|(block, is_red)| block.should_be_red() == **is_red)
        .count() as u32
}

pub fn is_solved(red: &[bool; BLOCK_COUNT]) -> bool {
    correct_blocks(red) == BLOCK_COUNT as u32
}
