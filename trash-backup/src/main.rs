use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use trash_backup::services::trash_watcher::TrashWatcher;
use trash_backup::{routes, utils, AppConfig, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file (environment is used otherwise)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to watch for new entries
    #[arg(long)]
    watch_dir: Option<PathBuf>,

    /// Directory receiving the backups
    #[arg(long)]
    backup_dir: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::from_env(),
    };
    if let Some(dir) = args.watch_dir {
        config.watch_dir = dir;
    }
    if let Some(dir) = args.backup_dir {
        config.backup_dir = dir;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    utils::logger::init(&config.log_level)?;

    tracing::info!(
        "Starting trash-backup v{} (watch: {}, backup: {})",
        env!("CARGO_PKG_VERSION"),
        config.watch_dir.display(),
        config.backup_dir.display()
    );

    let state = Arc::new(AppState::new(config.clone()));

    let cancel = CancellationToken::new();
    let watcher = TrashWatcher::new(
        config.watch_dir.clone(),
        config.backup_dir.clone(),
        config.poll_interval(),
        state.seen.clone(),
        state.hub.clone(),
    );
    let watcher_handle = watcher.start(cancel.clone())?;

    let app = routes::create_router(state.clone());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("   GET  /              - file browser");
    tracing::info!("   GET  /api/tree      - file tree API");
    tracing::info!("   POST /api/save-file - save an uploaded file");
    tracing::info!("   GET  /files/*       - backed up files");
    tracing::info!("   WS   /ws            - real-time backup notifications");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    tracing::info!("Shutting down...");
    cancel.cancel();

    match tokio::time::timeout(std::time::Duration::from_secs(5), watcher_handle).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Watcher task panicked: {}", e),
        Err(_) => tracing::warn!("Watcher did not stop in time"),
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    cancel.cancel();
}
