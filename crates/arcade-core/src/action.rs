use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::game_trait::GridSize;

/// The seven commands a client can send against a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    #[serde(rename = "RESET")]
    Reset,
    #[serde(rename = "ACTION1")]
    Action1,
    #[serde(rename = "ACTION2")]
    Action2,
    #[serde(rename = "ACTION3")]
    Action3,
    #[serde(rename = "ACTION4")]
    Action4,
    #[serde(rename = "ACTION5")]
    Action5,
    #[serde(rename = "ACTION6")]
    Action6,
}

impl CommandKind {
    pub const ALL: [CommandKind; 7] = [
        Self::Reset,
        Self::Action1,
        Self::Action2,
        Self::Action3,
        Self::Action4,
        Self::Action5,
        Self::Action6,
    ];

    /// Numeric action id echoed back in `action_input.id` (RESET is 0).
    pub fn id(self) -> u8 {
        match self {
            Self::Reset => 0,
            Self::Action1 => 1,
            Self::Action2 => 2,
            Self::Action3 => 3,
            Self::Action4 => 4,
            Self::Action5 => 5,
            Self::Action6 => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reset => "RESET",
            Self::Action1 => "ACTION1",
            Self::Action2 => "ACTION2",
            Self::Action3 => "ACTION3",
            Self::Action4 => "ACTION4",
            Self::Action5 => "ACTION5",
            Self::Action6 => "ACTION6",
        }
    }

    /// Turn this command plus optional coordinates into a game action.
    ///
    /// Returns `Ok(None)` for RESET. ACTION6 requires both coordinates inside
    /// `grid`; the simple actions ignore coordinates entirely.
    pub fn to_action(
        self,
        x: Option<i64>,
        y: Option<i64>,
        grid: GridSize,
    ) -> Result<Option<GameAction>, CommandError> {
        let action = match self {
            Self::Reset => return Ok(None),
            Self::Action1 => GameAction::Action1,
            Self::Action2 => GameAction::Action2,
            Self::Action3 => GameAction::Action3,
            Self::Action4 => GameAction::Action4,
            Self::Action5 => GameAction::Action5,
            Self::Action6 => {
                let (Some(x), Some(y)) = (x, y) else {
                    return Err(CommandError::InvalidAction(
                        "ACTION6 requires x and y".to_string(),
                    ));
                };
                if !grid.contains(x, y) {
                    return Err(CommandError::InvalidAction(format!(
                        "coordinates ({x}, {y}) outside {}x{} grid",
                        grid.width, grid.height
                    )));
                }
                // contains() guarantees both fit in u32
                GameAction::Action6 {
                    x: x as u32,
                    y: y as u32,
                }
            },
        };
        Ok(Some(action))
    }
}

impl FromStr for CommandKind {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CommandError::InvalidAction(format!("unknown command {s}")))
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, non-RESET action handed to game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    Action1,
    Action2,
    Action3,
    Action4,
    Action5,
    Action6 { x: u32, y: u32 },
}

impl GameAction {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Action1 => CommandKind::Action1,
            Self::Action2 => CommandKind::Action2,
            Self::Action3 => CommandKind::Action3,
            Self::Action4 => CommandKind::Action4,
            Self::Action5 => CommandKind::Action5,
            Self::Action6 { .. } => CommandKind::Action6,
        }
    }
}

/// Echo of the command that produced a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionInput {
    pub id: u8,
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl ActionInput {
    /// Build the echo for `kind`, folding client reasoning and coordinates into `data`.
    ///
    /// Object-valued reasoning is merged key by key; any other value is kept
    /// under `"reasoning"`. Coordinates always win over reasoning keys.
    pub fn new(
        kind: CommandKind,
        action: Option<&GameAction>,
        reasoning: Option<&serde_json::Value>,
    ) -> Self {
        let mut data = serde_json::Map::new();
        match reasoning {
            Some(serde_json::Value::Object(fields)) => data.extend(fields.clone()),
            Some(other) => {
                data.insert("reasoning".to_string(), other.clone());
            },
            None => {},
        }
        if let Some(GameAction::Action6 { x, y }) = action {
            data.insert("x".to_string(), (*x).into());
            data.insert("y".to_string(), (*y).into());
        }
        Self {
            id: kind.id(),
            data,
        }
    }
}
