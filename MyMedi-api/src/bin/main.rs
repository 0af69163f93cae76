use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use my_medi_api::api::create_application;
use my_medi_domain::config::AppConfig;
use my_medi_domain::database::{initialize_database_pool, DatabaseConfig};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();
}

/// Open the SQLite pool, by default at `<DATA_DIR>/mymedi.db`.
///
/// A pool failure is logged and the repositories keep their data in memory.
fn init_storage(data_dir: &Path) -> anyhow::Result<()> {
    if !data_dir.exists() {
        info!("Creating data directory {}", data_dir.display());
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    }

    let mut db_config = DatabaseConfig::from_env().context("Invalid database configuration")?;
    if env::var_os("DB_SQLITE_PATH").is_none() {
        db_config.sqlite_path = data_dir.join("mymedi.db");
    }

    match initialize_database_pool(&db_config) {
        Ok(()) => info!("Database pool initialized at {}", db_config.sqlite_path.display()),
        Err(e) => {
            error!("Failed to initialize database pool: {}", e);
            warn!("Feedback and accuracy data will not survive a restart");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = dotenv().is_ok();
    init_tracing();
    if !dotenv_loaded {
        warn!("No .env file found, using process environment only");
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting MyMedi server");

    let config = AppConfig::from_env();
    init_storage(Path::new(&config.data_dir))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, create_application(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
