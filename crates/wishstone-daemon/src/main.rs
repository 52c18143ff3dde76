//! wishstone-daemon: the Wishstone submission service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use wishstone_daemon::config::WishstoneConfig;
use wishstone_daemon::{build_cipher, build_classifier, http, logging, AppState};
use wishstone_db::SqliteRecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = WishstoneConfig::load()?;

    // Ensure data directory exists
    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;

    // Initialize tracing: console at the configured level, daily file at debug
    let _log_guard = logging::init(&config.advanced.log_level, &data_dir)?;

    info!("Wishstone daemon starting");
    info!("Debug log in {:?}", logging::log_dir(&data_dir));

    // 2. Open database
    let db_path = config.database_path();
    let store = Arc::new(SqliteRecordStore::open(&db_path)?);
    info!("Database ready at {:?}", db_path);

    // 3. Cipher and classifier
    let cipher = build_cipher();
    let classifier = build_classifier(&config.classifier);

    // 4. Build shared state
    let state = Arc::new(AppState::new(
        store,
        cipher,
        classifier,
        config.quota_limits(),
    ));

    // 5. Serve until shutdown
    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl-C received, shutting down"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Terminate signal received, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
