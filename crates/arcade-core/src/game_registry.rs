use serde::{Deserialize, Serialize};

use crate::game_trait::{GameId, GameInfo};

/// A catalog entry as listed by `GET /api/games`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: GameId,
    pub title: String,
}

impl From<&GameInfo> for GameSummary {
    fn from(info: &GameInfo) -> Self {
        Self {
            game_id: info.game_id.clone(),
            title: info.title.clone(),
        }
    }
}
