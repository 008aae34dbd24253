//! Rollcall Server - REST API for face-verified employee check-in
//!
//! Boots configuration, database pool and migrations, the upload directory,
//! and the axum router, then serves until ctrl-c or SIGTERM.

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use rollcall_server::{create_router, db, AppState, Config};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rollcall_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    let pool = match &config.database_url {
        Some(url) => match db::connect(url, &config).await {
            Ok(pool) => Some(pool),
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize database");
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!(
                "DATABASE_URL not set; employee and attendance endpoints will return 503"
            );
            None
        }
    };

    if let Err(e) = tokio::fs::create_dir_all(&config.upload_path).await {
        tracing::error!(
            path = %config.upload_path.display(),
            error = %e,
            "Failed to create upload directory"
        );
        std::process::exit(1);
    }
    tracing::info!(path = %config.upload_path.display(), "Upload directory ready");

    let state = AppState::new(&config, pool);
    let app = create_router(state, &config);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on http://{}", addr);
    tracing::info!("API docs at http://{}/docs", addr);

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
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

    tracing::info!("Shutdown signal received");
}
