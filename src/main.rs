//! snekbot - IRC bot daemon.

use std::sync::Arc;

use snekbot::commands::builtin::BuiltinHandlers;
use snekbot::config::{Config, validate};
use snekbot::{Database, Session};
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "snekbot.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration problem(s) in {config_path}", errors.len());
    }

    info!(
        host = %config.server.host,
        port = config.server.port,
        nick = %config.identity.nickname,
        "Starting snekbot"
    );

    let db = Database::new(&config.database.path).await?;
    let config = Arc::new(config);

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl-C");
                let _ = signal_tx.send(());
            }
            Err(e) => error!(error = %e, "Failed to listen for Ctrl-C"),
        }
    });

    let mut session = Session::new(config, db, Arc::new(BuiltinHandlers), shutdown_rx);
    session.run().await?;

    drop(shutdown_tx);
    Ok(())
}
