use std::sync::Arc;

use lobby::{
    AppState,
    cache::{MemoryCache, RedisCache, SharedCache},
    config::Config,
    db,
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;
    let db_pool = db::connect(&config.database_url).await?;
    tokio::fs::create_dir_all(config.avatar_dir()).await?;

    let listener = TcpListener::bind(&config.bind_addr).await?;
    let cache: SharedCache = match &config.redis_url {
        Some(redis_url) => Arc::new(RedisCache::connect(redis_url, "lobby").await?),
        None => Arc::new(MemoryCache::new()),
    };
    let app_state = AppState::new(db_pool, cache, config);

    info!("lobby listening on {}", listener.local_addr()?);
    axum::serve(listener, lobby::app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("lobby shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("cannot listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
        info!("received ctrl-c, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("received SIGTERM, shutting down");
            }
            Err(e) => {
                error!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
