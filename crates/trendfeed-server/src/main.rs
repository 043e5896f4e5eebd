mod api;
mod middleware;
mod scheduler;

use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = trendfeed_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = trendfeed_db::PoolConfig::from_app_config(&config);
    let pool = trendfeed_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = trendfeed_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations complete");

    let state = AppState::from_config(pool.clone(), &config)?;
    let mut scheduler = scheduler::build_scheduler(state.clone(), &config).await?;

    let auth = AuthState::from_env(
        matches!(config.env, trendfeed_core::Environment::Development),
        config.api_key_hash_salt.as_deref(),
    )?;
    let app = build_app(state, auth);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "trendfeed-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = scheduler.shutdown().await {
        tracing::warn!(error = %e, "scheduler shutdown failed");
    }
    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
