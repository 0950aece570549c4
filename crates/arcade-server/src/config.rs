use std::time::Duration;

use serde::Deserialize;

/// Config file read from the working directory when present.
pub const CONFIG_FILE: &str = "arcade.toml";

/// Top-level server configuration, loaded from `arcade.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub web_root: String,
    pub auth: AuthFileConfig,
    pub games: GamesConfig,
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3193".to_string(),
            web_root: "web".to_string(),
            auth: AuthFileConfig::default(),
            games: GamesConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Auth section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthFileConfig {
    /// Value required in `X-API-Key` on `/api` routes. None = auth disabled.
    pub api_key: Option<String>,
}

/// Which games the registry loads at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GamesConfig {
    /// Directory scanned for level packs (`<data_dir>/<game_id>/level_N/`).
    pub data_dir: String,
    /// Action budget of the block toggle puzzle.
    pub blocks_max_actions: u32,
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            data_dir: "game_data".to_string(),
            blocks_max_actions: 64,
        }
    }
}

/// Timeouts and request size limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Upper bound on a single `init`/`apply` call.
    pub logic_timeout_ms: u64,
    /// Max tags accepted when opening a scorecard.
    pub max_tags: usize,
    pub max_tag_len: usize,
    pub max_url_len: usize,
    /// Whole-request timeout applied by the HTTP layer.
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            logic_timeout_ms: 2000,
            max_tags: 20,
            max_tag_len: 64,
            max_url_len: 2048,
            request_timeout_secs: 10,
        }
    }
}

impl LimitsConfig {
    pub fn logic_timeout(&self) -> Duration {
        Duration::from_millis(self.logic_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl ServerConfig {
    /// Validate configuration, logging warnings for issues.
    pub fn validate(&self) {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            tracing::error!(
                addr = %self.listen_addr,
                "listen_addr is not a valid socket address"
            );
            std::process::exit(1);
        }

        if self.auth.api_key.is_some() {
            tracing::warn!("api_key is set in config file, prefer ARCADE_API_KEY in production");
        }
        if self.auth.api_key.as_deref() == Some("") {
            tracing::error!("auth.api_key must not be empty");
            std::process::exit(1);
        }

        if self.games.blocks_max_actions == 0 {
            tracing::error!("games.blocks_max_actions must be > 0");
            std::process::exit(1);
        }

        if self.limits.logic_timeout_ms == 0 {
            tracing::error!("limits.logic_timeout_ms must be > 0");
            std::process::exit(1);
        }
        if self.limits.request_timeout_secs == 0 {
            tracing::error!("limits.request_timeout_secs must be > 0");
            std::process::exit(1);
        }
        if self.limits.logic_timeout() >= self.limits.request_timeout() {
            tracing::warn!(
                logic_ms = self.limits.logic_timeout_ms,
                request_secs = self.limits.request_timeout_secs,
                "logic_timeout_ms is not below request_timeout_secs; slow games will surface as HTTP timeouts"
            );
        }
    }

    /// Load config from `arcade.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string(CONFIG_FILE) {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {CONFIG_FILE}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {CONFIG_FILE}: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {CONFIG_FILE} found, using defaults");
                ServerConfig::default()
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Apply `ARCADE_*` overrides read through `lookup`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("ARCADE_LISTEN_ADDR")
            && !addr.is_empty()
        {
            self.listen_addr = addr;
        }
        if let Some(root) = lookup("ARCADE_WEB_ROOT")
            && !root.is_empty()
        {
            self.web_root = root;
        }
        if let Some(key) = lookup("ARCADE_API_KEY")
            && !key.is_empty()
        {
            self.auth.api_key = Some(key);
        }
        if let Some(dir) = lookup("ARCADE_GAME_DATA_DIR")
            && !dir.is_empty()
        {
            self.games.data_dir = dir;
        }
        if let Some(val) = lookup("ARCADE_LOGIC_TIMEOUT_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            self.limits.logic_timeout_ms = ms;
        }
    }
}
