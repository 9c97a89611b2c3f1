//! phonod - player service entry point
//!
//! Wires the playlist backend, the player engine, and the REST API
//! together, then serves until a shutdown signal arrives. The player is
//! closed after the server drains, which persists the file-backed playlist.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phono::api;
use phono::config::{Args, Config};
use phono::player::Player;
use phono::playlist::{file::FilePlaylist, memory::MemoryPlaylist, Playlist};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phono=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::load(&args).context("Failed to load configuration")?;

    info!("Starting phonod on port {}", config.port);

    // Select the playlist backend
    let playlist: Arc<dyn Playlist> = match &config.store_file {
        Some(path) => {
            info!("Playlist store: {}", path.display());
            Arc::new(
                FilePlaylist::open(path, config.restore)
                    .context("Failed to open playlist store")?,
            )
        }
        None => {
            info!("Playlist store: in-memory");
            Arc::new(MemoryPlaylist::new())
        }
    };

    // Initialize the player engine
    let mut player = Player::new(playlist);
    player.set_command_deadline(config.command_deadline);
    let player = Arc::new(player);
    info!("Player engine initialized");

    // Build the application router
    let app_state = api::AppState {
        player: Arc::clone(&player),
        port: config.port,
    };
    let app = api::create_router(app_state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Tears down the driver and persists the playlist store.
    player.close().await.context("Failed to close player")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
