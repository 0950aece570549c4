use serde::{Deserialize, Serialize};

use crate::action::GameAction;
use crate::error::GameLogicError;
use crate::frame::Frame;

/// Identifier of a registered game (e.g. `"bt01"`).
pub type GameId = String;

/// Identifier of a running game instance (the `guid` on the wire).
pub type InstanceId = String;

/// Identifier of a scorecard.
pub type CardId = String;

/// Core trait that every playable game must implement.
///
/// The server owns instance bookkeeping, scorecards and transport; a game only
/// turns an opaque state plus an action into the next state and frame. State is
/// serialized by the game itself so the server never needs to know its shape.
pub trait GameLogic: Send + Sync {
    /// Static description used by the registry and for coordinate validation.
    fn info(&self) -> GameInfo;

    /// Build the initial state and first frame of a fresh play.
    fn init(&self) -> Result<Transition, GameLogicError>;

    /// Advance `state` by one action.
    fn apply(&self, state: &[u8], action: &GameAction) -> Result<Transition, GameLogicError>;
}

/// Game metadata exposed by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub game_id: GameId,
    pub title: String,
    pub grid: GridSize,
    /// Score at which a play counts as fully solved.
    pub win_score: u32,
}

/// Dimensions of the clickable grid for ACTION6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub const fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }
}

/// Lifecycle status of a game instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    #[default]
    NotStarted,
    #[serde(rename = "NOT_FINISHED", alias = "IN_PROGRESS")]
    InProgress,
    Win,
    GameOver,
}

impl GameStatus {
    /// WIN and GAME_OVER accept nothing but RESET.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Win | Self::GameOver)
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "NOT_FINISHED",
            Self::Win => "WIN",
            Self::GameOver => "GAME_OVER",
        };
        f.write_str(s)
    }
}

/// Result of `init` or `apply`: everything the server commits for one step.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: Vec<u8>,
    pub frame: Frame,
    pub score: u32,
    pub status: GameStatus,
}

/// Encode a game's private state the way every bundled game does.
pub fn encode_state<S: Serialize>(state: &S) -> Result<Vec<u8>, GameLogicError> {
    rmp_serde::to_vec(state).map_err(|e| GameLogicError::State(e.to_string()))
}

/// Decode state previously produced by [`encode_state`].
pub fn decode_state<S: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<S, GameLogicError> {
    rmp_serde::from_slice(bytes).map_err(|e| GameLogicError::State(e.to_string()))
}
