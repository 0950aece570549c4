pub mod loader;

use std::path::Path;

use serde::{Deserialize, Serialize};

use arcade_core::action::GameAction;
use arcade_core::error::GameLogicError;
use arcade_core::frame::{FRAME_SIZE, Frame, Grid, PALETTE_SIZE};
use arcade_core::game_trait::{
    GameInfo, GameLogic, GameStatus, GridSize, Transition, decode_state, encode_state,
};

use loader::LevelPack;

/// Score reported when the current grid matches its target exactly.
pub const FULL_MATCH_SCORE: u32 = 100;

/// Serialized per-instance state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    pub level: usize,
    pub grid: Grid,
    pub actions_taken: u32,
}

/// A game played over a pack of levels loaded from disk.
///
/// ACTION6 cycles the clicked cell through the palette; the other actions
/// leave the grid alone. Matching a level's target advances to the next level,
/// and matching the last one wins.
pub struct LevelGame {
    pack: LevelPack,
}

impl LevelGame {
    pub fn new(pack: LevelPack) -> Self {
        Self { pack }
    }

    /// Load every pack under `data_dir` as a game.
    pub fn discover(data_dir: &Path) -> Vec<LevelGame> {
        loader::discover(data_dir)
            .into_iter()
            .map(LevelGame::new)
            .collect()
    }

    fn level_grid(&self, level: usize) -> Result<&Grid, GameLogicError> {
        self.pack
            .levels
            .get(level)
            .map(|l| &l.initial)
            .ok_or_else(|| {
                GameLogicError::NoContent(format!("{} has no level {level}", self.pack.game_id))
            })
    }

    fn transition(&self, mut state: LevelState) -> Result<Transition, GameLogicError> {
        let target = self
            .pack
            .levels
            .get(state.level)
            .and_then(|l| l.target.as_ref());

        let mut score = target.map_or(0, |t| match_percent(&state.grid, t));
        let mut status = GameStatus::InProgress;

        if score == FULL_MATCH_SCORE && state.actions_taken > 0 {
            if state.level + 1 < self.pack.levels.len() {
                state.level += 1;
                state.grid = self.level_grid(state.level)?.clone();
                tracing::debug!(
                    game_id = %self.pack.game_id,
                    level = state.level,
                    "Level complete, advancing"
                );
                let next_target = self.pack.levels[state.level].target.as_ref();
                score = next_target.map_or(0, |t| match_percent(&state.grid, t));
            } else {
                status = GameStatus::Win;
            }
        }

        if status != GameStatus::Win
            && let Some(max) = self.pack.max_actions
            && state.actions_taken >= max
        {
            status = GameStatus::GameOver;
        }

        Ok(Transition {
            frame: Frame::single(state.grid.clone()),
            state: encode_state(&state)?,
            score,
            status,
        })
    }
}

impl GameLogic for LevelGame {
    fn info(&self) -> GameInfo {
        GameInfo {
            game_id: self.pack.game_id.clone(),
            title: self.pack.title.clone(),
            grid: GridSize::square(FRAME_SIZE as u32),
            win_score: FULL_MATCH_SCORE,
        }
    }

    fn init(&self) -> Result<Transition, GameLogicError> {
        let grid = self.level_grid(0)?.clone();
        self.transition(LevelState {
            level: 0,
            grid,
            actions_taken: 0,
        })
    }

    fn apply(&self, state: &[u8], action: &GameAction) -> Result<Transition, GameLogicError> {
        let mut state: LevelState = decode_state(state)?;
        state.actions_taken += 1;
        if let GameAction::Action6 { x, y } = *action
            && let Some(cell) = state
                .grid
                .get_mut(y as usize)
                .and_then(|row| row.get_mut(x as usize))
        {
            *cell = (*cell + 1) % PALETTE_SIZE;
        }
        self.transition(state)
    }
}

/// Percentage (0-100, floored) of cells in `grid` equal to `target`.
pub fn match_percent(grid: &Grid, target: &Grid) -> u32 {
    let total = FRAME_SIZE * FRAME_SIZE;
    let matching = (0..FRAME_SIZE)
        .flat_map(|y| (0..FRAME_SIZE).map(move |x| (x, y)))
        .filter(|&(x, y)| {
            let a = grid.get(y).and_then(|r| r.get(x));
            let b = target.get(y).and_then(|r| r.get(x));
            a == b
        })
        .count();
    (matching * FULL_MATCH_SCORE as usize / total) as u32
}
