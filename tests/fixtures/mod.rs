//! Spins the real router up on an ephemeral port backed by a throwaway
//! SQLite file and media directory.

#![allow(dead_code)]

use std::{net::SocketAddr, num::NonZeroU32, path::PathBuf, sync::Arc};

use lobby::{
    AppState,
    cache::{MemoryCache, SharedCache},
    config::Config,
    db,
};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A minimal PNG: the signature followed by an IHDR chunk header.
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x06\0\0\0";

pub struct TestServer {
    addr: SocketAddr,
    pub db_pool: SqlitePool,
    pub cache: SharedCache,
    pub media_root: PathBuf,
    _dir: TempDir,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Like [`TestServer::start`], with a chance to adjust the config first.
    pub async fn start_with(configure: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = Config {
            database_url: format!("sqlite://{}", dir.path().join("lobby.db").display()),
            bind_addr: "127.0.0.1:0".to_owned(),
            media_root: dir.path().join("media"),
            session_idle_minutes: NonZeroU32::new(60).expect("non-zero"),
            room_cache_ttl: None,
            redis_url: None,
            secure_cookies: false,
        };
        configure(&mut config);

        let db_pool = db::connect(&config.database_url)
            .await
            .expect("Failed to open database");
        let cache: SharedCache = Arc::new(MemoryCache::new());
        let media_root = config.media_root.clone();
        let app_state = AppState::new(db_pool.clone(), cache.clone(), config);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, lobby::app(app_state))
                .await
                .expect("Server failed");
        });

        Self {
            addr,
            db_pool,
            cache,
            media_root,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}/api{path}", self.addr)
    }

    /// A client that keeps the session cookie between requests.
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to build client")
    }

    pub async fn sign_up(
        &self,
        username: &str,
        password: &str,
        nickname: &str,
    ) -> reqwest::Response {
        self.client()
            .post(self.url("/sign_up"))
            .json(&json!({
                "username": username,
                "password": password,
                "nickname": nickname,
                "email": "asdf@asdf.com",
            }))
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn sign_in(
        &self,
        client: &reqwest::Client,
        username: &str,
        password: &str,
    ) -> reqwest::Response {
        client
            .post(self.url("/sign_in"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Signs `skystar` up and returns a client holding their session.
    pub async fn skystar(&self) -> reqwest::Client {
        assert_eq!(self.sign_up("skystar", "doge", "usezmap").await.status(), 201);
        let client = self.client();
        assert_eq!(self.sign_in(&client, "skystar", "doge").await.status(), 200);
        client
    }
}

pub async fn json_body(response: reqwest::Response) -> Value {
    response.json().await.expect("Failed to parse JSON")
}
