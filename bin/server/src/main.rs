use magnolia_gateway::GatewayClient;
use magnolia_server::{
    config::ServerConfig,
    db::PgSessionStorage,
    error::StartupError,
    router,
    state::AppState,
};
use magnolia_session::{MemoryStorage, SessionStorage, SessionStore};
use magnolia_tools::ToolDispatcher;
use rootcause::Report;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(report) = run().await {
        tracing::error!("{report}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Report<StartupError>> {
    // Load configuration from environment
    let config = ServerConfig::from_env().map_err(|e| StartupError::Config {
        details: e.to_string(),
    })?;
    tracing::info!(environment = %config.environment, "Loaded configuration");

    let storage = session_storage(&config).await?;
    let sessions = SessionStore::new(storage).with_mailbox_capacity(config.session.mailbox_capacity);

    let client = GatewayClient::new(config.gateway.clone()).map_err(|e| StartupError::Gateway {
        details: e.to_string(),
    })?;
    tracing::info!(gateway = %client.base_url(), "Gateway client ready");
    let dispatcher = ToolDispatcher::new(client);

    let addr = config.bind_addr.clone();
    let app = router(Arc::new(AppState::new(config, dispatcher, sessions)));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StartupError::Serve {
            details: format!("failed to bind {addr}: {e}"),
        })?;

    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Serve {
            details: e.to_string(),
        })?;

    tracing::info!("server stopped");
    Ok(())
}

/// Picks durable storage when a database is configured.
async fn session_storage(
    config: &ServerConfig,
) -> Result<Arc<dyn SessionStorage>, Report<StartupError>> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set, session state will not survive restarts");
        return Ok(Arc::new(MemoryStorage::new()));
    };

    // Create database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|e| StartupError::Database {
            details: e.to_string(),
        })?;

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| StartupError::Database {
            details: e.to_string(),
        })?;

    Ok(Arc::new(PgSessionStorage::new(db_pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
