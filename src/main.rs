use anyhow::Result;
use clap::Parser;
use rtt_gateway::{create_router, AppState, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rtt-gateway", about = "Gateway for vendor real-time transcription tasks")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/rtt-gateway")]
    config: String,

    /// Override the bind address from the config file
    #[arg(long)]
    bind: Option<String>,

    /// Override the port from the config file
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a local .env during development
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(bind) = args.bind {
        cfg.service.http.bind = bind;
    }
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} starting", cfg.service.name);
    info!("Vendor API base: {}", cfg.vendor.base_url);
    info!(
        "Recognition language: {} (max idle {}s)",
        cfg.rtt.language, cfg.rtt.max_idle_time_secs
    );
    if cfg.storage.is_some() {
        info!("Cloud-storage transcript output is enabled");
    }

    let state = AppState::new(&cfg)?;
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
