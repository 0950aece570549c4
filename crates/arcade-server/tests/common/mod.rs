use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use arcade_core::test_helpers::ScriptedGame;

use arcade_server::config::{AuthFileConfig, GamesConfig, ServerConfig};
use arcade_server::game_registry::GameRegistry;
use arcade_server::{build_app, build_app_with_registry};

pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server with no auth, serving the scripted games `g1` and `g2`.
    pub async fn new() -> Self {
        Self::scripted(ServerConfig::default()).await
    }

    /// Start a test server that requires `X-API-Key: key`.
    pub async fn with_api_key(key: &str) -> Self {
        let config = ServerConfig {
            auth: AuthFileConfig {
                api_key: Some(key.to_string()),
            },
            ..ServerConfig::default()
        };
        Self::scripted(config).await
    }

    /// Start a test server with the bundled games, loading level packs from `data_dir`.
    pub async fn with_bundled_games(data_dir: &std::path::Path) -> Self {
        let config = ServerConfig {
            games: GamesConfig {
                data_dir: data_dir.to_string_lossy().into_owned(),
                ..GamesConfig::default()
            },
            ..ServerConfig::default()
        };
        let (app, _state) = build_app(config);
        Self::serve(app).await
    }

    async fn scripted(config: ServerConfig) -> Self {
        let mut registry = GameRegistry::new();
        registry.register(Arc::new(ScriptedGame::new("g1")));
        registry.register(Arc::new(ScriptedGame::new("g2")));
        let (app, _state) = build_app_with_registry(config, registry);
        Self::serve(app).await
    }

    async fn serve(app: axum::Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }
}

/// POST a JSON body and return status plus parsed JSON response.
pub async fn post_json(
    client: &reqwest::Client,
    url: &str,
    body: &serde_json::Value,
) -> (u16, serde_json::Value) {
    let resp = client.post(url).json(body).send().await.unwrap();
    let status = resp.status().as_u16();
    let json = resp.json().await.unwrap_or(serde_json::Value::Null);
    (status, json)
}
