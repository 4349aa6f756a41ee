//! meetai-server - Meet.AI backend service
//!
//! Startup: CLI → TOML config → logging → database → HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use meetai_common::config::{self, TomlConfig};
use meetai_common::db::{billing, init_database};
use meetai_server::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for meetai-server
#[derive(Parser, Debug)]
#[command(name = "meetai-server")]
#[command(about = "Meet.AI backend: agents, meetings and free-tier limits")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "MEETAI_CONFIG")]
    config: Option<PathBuf>,

    /// Folder holding meetai.db
    #[arg(short, long, env = "MEETAI_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Address to bind (overrides config)
    #[arg(long, env = "MEETAI_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "MEETAI_PORT")]
    port: Option<u16>,
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "meetai_server={lvl},meetai_common={lvl},tower_http={lvl}",
            lvl = default_level
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (toml_config, config_source) =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    init_tracing(&toml_config.logging.level);

    // Log build identification immediately after tracing init
    info!(
        "Starting Meet.AI server (meetai-server) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    config_source.log();

    let root_folder = config::resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path = config::database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    billing::seed_products(&pool, &toml_config.billing.products)
        .await
        .context("Failed to seed products")?;

    let policy = toml_config.free_tier.policy();
    info!(
        "Free tier: {} agents, {} meetings (+1 each per {} referrals)",
        policy.max_agents,
        policy.max_meetings,
        meetai_common::usage::REFERRALS_PER_BONUS
    );

    if toml_config.billing.sync_token.is_none() {
        info!("Billing sync disabled (no billing.sync_token configured)");
    }

    let state = AppState::new(pool, policy, toml_config.billing.sync_token.clone());
    let app = build_router(state);

    let host = args.host.unwrap_or(toml_config.server.host);
    let port = args.port.unwrap_or(toml_config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("meetai-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
