//! Process wiring: database, router, listener, shutdown.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::routes::build_router;
use crate::state::AppState;
use log::{info, warn};
use tokio::net::TcpListener;
use toodo_core::db::open_db;

/// Opens storage and serves HTTP until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let conn = open_db(&config.db_path)?;
    let state = AppState::new(conn, config.sync_mode());
    let app = build_router(state, &config.ui_dir);

    let listener = TcpListener::bind(config.listen)
        .await
        .map_err(ServerError::Bind)?;
    info!(
        "event=server_start module=server status=ok listen={} db_path={} ui_dir={} sync_mode={} version={}",
        config.listen,
        config.db_path.display(),
        config.ui_dir.display(),
        config.sync_mode().as_str(),
        toodo_core::core_version()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=shutdown_signal module=server status=error error={err}");
    }
}
