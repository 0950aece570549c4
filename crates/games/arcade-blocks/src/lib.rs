pub mod layout;
pub mod scoring;

use serde::{Deserialize, Serialize};

use arcade_core::action::GameAction;
use arcade_core::error::GameLogicError;
use arcade_core::frame::{COLOR_BLACK, COLOR_BLUE, COLOR_RED, Frame, blank_grid};
use arcade_core::game_trait::{
    GameInfo, GameLogic, GameStatus, GridSize, Transition, decode_state, encode_state,
};

use layout::{BLOCK_COUNT, block_at, blocks};

/// Registry id of the block toggle puzzle.
pub const GAME_ID: &str = "bt01";

/// Tunables for the block toggle puzzle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocksConfig {
    /// Actions allowed before an unsolved board becomes GAME_OVER.
    pub max_actions: u32,
}

impl Default for BlocksConfig {
    fn default() -> Self {
        Self { max_actions: 64 }
    }
}

/// Serialized per-instance state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocksState {
    /// Whether each block (reading order) is currently red.
    pub red: [bool; BLOCK_COUNT],
    pub actions_taken: u32,
}

impl BlocksState {
    fn fresh() -> Self {
        Self {
            red: [false; BLOCK_COUNT],
            actions_taken: 0,
        }
    }
}

/// Eight 12x12 blocks around an empty centre. Clicking a block flips it
/// between blue and red; the puzzle is solved when the edge-centre blocks are
/// red and the corners are blue.
pub struct BlockToggle {
    config: BlocksConfig,
}

impl Default for BlockToggle {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockToggle {
    pub fn new() -> Self {
        Self::with_config(BlocksConfig::default())
    }

    pub fn with_config(config: BlocksConfig) -> Self {
        Self { config }
    }

    fn transition(&self, state: &BlocksState) -> Result<Transition, GameLogicError> {
        let score = scoring::correct_blocks(&state.red);
        let status = if scoring::is_solved(&state.red) {
            GameStatus::Win
        } else if state.actions_taken >= self.config.max_actions {
            GameStatus::GameOver
        } else {
            GameStatus::InProgress
        };
        Ok(Transition {
            state: encode_state(state)?,
            frame: render(state),
            score,
            status,
        })
    }
}

impl GameLogic for BlockToggle {
    fn info(&self) -> GameInfo {
        GameInfo {
            game_id: GAME_ID.to_string(),
            title: "BT01 Block Toggle".to_string(),
            grid: GridSize::square(64),
            win_score: BLOCK_COUNT as u32,
        }
    }

    fn init(&self) -> Result<Transition, GameLogicError> {
        self.transition(&BlocksState::fresh())
    }

    fn apply(&self, state: &[u8], action: &GameAction) -> Result<Transition, GameLogicError> {
        let mut state: BlocksState = decode_state(state)?;
        state.actions_taken += 1;
        if let GameAction::Action6 { x, y } = *action {
            match block_at(x, y) {
                Some(i) => {
                    state.red[i] = !state.red[i];
                    tracing::debug!(block = blocks()[i].number, red = state.red[i], "Block toggled");
                },
                None => tracing::debug!(x, y, "Click outside any block"),
            }
        }
        self.transition(&state)
    }
}

/// Paint the board: black background, each block in its current color.
fn render(state: &BlocksState) -> Frame {
    let mut grid = blank_grid(COLOR_BLACK);
    for (block, &is_red) in blocks().iter().zip(state.red.iter()) {
        let color = if is_red { COLOR_RED } else { COLOR_BLUE };
        for y in block.y1..=block.y2 {
            for x in block.x1..=block.x2 {
                grid[y as usize][x as usize] = color;
            }
        }
    }
    Frame::single(grid)
}
