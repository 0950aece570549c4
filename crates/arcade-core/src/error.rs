use thiserror::Error;

use crate::game_trait::GameStatus;

/// Errors raised by the command core. Each is reported synchronously to the
/// caller; the transport decides the response code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown game_id: {0}")]
    UnknownGame(String),

    #[error("unknown guid: {0}")]
    UnknownInstance(String),

    /// The instance exists but was created for another game.
    #[error("guid {instance_id} belongs to {actual}, not {requested}")]
    GameMismatch {
        instance_id: String,
        actual: String,
        requested: String,
    },

    #[error("instance {instance_id} is {status}; RESET required")]
    InstanceTerminal {
        instance_id: String,
        status: GameStatus,
    },

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("unknown card_id: {0}")]
    UnknownScorecard(String),

    #[error("scorecard {0} is closed")]
    ScorecardClosed(String),

    #[error("game logic failed: {0}")]
    GameLogic(#[from] GameLogicError),

    #[error("game logic exceeded {0} ms")]
    GameLogicTimeout(u64),
}

/// Errors a game implementation reports from `init` or `apply`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameLogicError {
    /// Stored state could not be encoded or decoded.
    #[error("state codec error: {0}")]
    State(String),

    /// The game has no playable content (e.g. a level pack with no levels).
    #[error("no playable content: {0}")]
    NoContent(String),

    /// The game logic task panicked or was cancelled.
    #[error("game logic aborted: {0}")]
    Aborted(String),
}
