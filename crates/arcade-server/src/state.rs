use std::sync::Arc;

use crate::auth::AuthConfig;
use crate::config::ServerConfig;
use crate::dispatcher::CommandDispatcher;
use crate::game_registry::GameRegistry;
use crate::instance_manager::InstanceManager;
use crate::scorecard_manager::ScorecardManager;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<GameRegistry>,
    pub instances: Arc<InstanceManager>,
    pub scorecards: Arc<ScorecardManager>,
    pub dispatcher: CommandDispatcher,
    pub auth: AuthConfig,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// State with every compiled-in game registered.
    pub fn new(config: ServerConfig) -> Self {
        let registry = GameRegistry::with_defaults(&config.games);
        Self::with_registry(config, registry)
    }

    /// State over an explicit registry.
    pub fn with_registry(config: ServerConfig, registry: GameRegistry) -> Self {
        let registry = Arc::new(registry);
        let instances = Arc::new(InstanceManager::new(config.limits.logic_timeout()));
        let scorecards = Arc::new(ScorecardManager::new());
        let dispatcher = CommandDispatcher::new(
            Arc::clone(&registry),
            Arc::clone(&instances),
            Arc::clone(&scorecards),
        );
        let auth = AuthConfig {
            api_key: config.auth.api_key.clone(),
        };
        Self {
            registry,
            instances,
            scorecards,
            dispatcher,
            auth,
            config: Arc::new(config),
        }
    }
}
