pub mod action;
pub mod error;
pub mod frame;
pub mod game_registry;
pub mod game_trait;
pub mod messages;
pub mod scorecard;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use serde::{Deserialize, Serialize};

    use crate::action::GameAction;
    use crate::error::GameLogicError;
    use crate::frame::{Frame, blank_grid};
    use crate::game_trait::{
        GameInfo, GameLogic, GameStatus, GridSize, Transition, decode_state, encode_state,
    };

    /// Score a [`ScriptedGame`] reports when ACTION2 wins.
    pub const SCRIPTED_WIN_SCORE: u32 = 10;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct ScriptedState {
        score: u32,
        marks: Vec<(u32, u32)>,
    }

    /// Deterministic game for exercising the command core:
    /// ACTION1 adds a point, ACTION2 wins with [`SCRIPTED_WIN_SCORE`],
    /// ACTION3 ends the game, ACTION4/5 do nothing, ACTION6 marks a cell.
    pub struct ScriptedGame {
        game_id: String,
    }

    impl ScriptedGame {
        pub fn new(game_id: &str) -> Self {
            Self {
                game_id: game_id.to_string(),
            }
        }
    }

    impl GameLogic for ScriptedGame {
        fn info(&self) -> GameInfo {
            GameInfo {
                game_id: self.game_id.clone(),
                title: format!("Scripted {}", self.game_id),
                grid: GridSize::square(64),
                win_score: SCRIPTED_WIN_SCORE,
            }
        }

        fn init(&self) -> Result<Transition, GameLogicError> {
            let state = ScriptedState::default();
            Ok(Transition {
                frame: render(&state),
                state: encode_state(&state)?,
                score: 0,
                status: GameStatus::InProgress,
            })
        }

        fn apply(&self, state: &[u8], action: &GameAction) -> Result<Transition, GameLogicError> {
            let mut s: ScriptedState = decode_state(state)?;
            let mut status = GameStatus::InProgress;
            match action {
                GameAction::Action1 => s.score += 1,
                GameAction::Action2 => {
                    s.score = SCRIPTED_WIN_SCORE;
                    status = GameStatus::Win;
                },
                GameAction::Action3 => status = GameStatus::GameOver,
                GameAction::Action4 | GameAction::Action5 => {},
                GameAction::Action6 { x, y } => s.marks.push((*x, *y)),
            }
            Ok(Transition {
                frame: render(&s),
                state: encode_state(&s)?,
                score: s.score,
                status,
            })
        }
    }

    fn render(state: &ScriptedState) -> Frame {
        let mut grid = blank_grid(0);
        for &(x, y) in &state.marks {
            grid[y as usize][x as usize] = 1;
        }
        Frame::single(grid)
    }
}
