use std::collections::BTreeMap;
use std::sync::Arc;

use arcade_core::game_registry::GameSummary;
use arcade_core::game_trait::{GameId, GameInfo, GameLogic};

use crate::config::GamesConfig;

/// A registered game: its cached metadata plus the logic that drives it.
#[derive(Clone)]
pub struct RegisteredGame {
    pub info: GameInfo,
    pub logic: Arc<dyn GameLogic>,
}

/// Catalog of playable games, keyed by game id. Read-only once the server starts.
#[derive(Default)]
pub struct GameRegistry {
    games: BTreeMap<GameId, RegisteredGame>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every game compiled in, configured from `config`.
    pub fn with_defaults(config: &GamesConfig) -> Self {
        let mut registry = Self::new();
        registry.register_defaults(config);
        registry
    }

    #[cfg_attr(not(any(feature = "blocks", feature = "levels")), allow(unused_variables))]
    fn register_defaults(&mut self, config: &GamesConfig) {
        #[cfg(feature = "blocks")]
        self.register(Arc::new(arcade_blocks::BlockToggle::with_config(
            arcade_blocks::BlocksConfig {
                max_actions: config.blocks_max_actions,
            },
        )));
        #[cfg(feature = "levels")]
        for game in arcade_levels::LevelGame::discover(std::path::Path::new(&config.data_dir)) {
            self.register(Arc::new(game));
        }
    }

    /// Add a game. A later registration under the same id replaces the earlier one.
    pub fn register(&mut self, logic: Arc<dyn GameLogic>) {
        let info = logic.info();
        if self.games.contains_key(&info.game_id) {
            tracing::warn!(game_id = %info.game_id, "Game registered twice, replacing");
        } else {
            tracing::info!(game_id = %info.game_id, title = %info.title, "Registered game");
        }
        self.games
            .insert(info.game_id.clone(), RegisteredGame { info, logic });
    }

    pub fn get(&self, game_id: &str) -> Option<RegisteredGame> {
        self.games.get(game_id).cloned()
    }

    /// Every registered game, ordered by id.
    pub fn list(&self) -> Vec<GameSummary> {
        self.games
            .values()
            .map(|g| GameSummary::from(&g.info))
            .collect()
    }

    /// Return the number of registered games.
    pub fn available_games(&self) -> usize {
        self.games.len()
    }
}
