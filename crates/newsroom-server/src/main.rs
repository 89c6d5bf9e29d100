//! Newsroom - news publishing REST service

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::Config;
use newsroom_api::{AppState, create_router};
use newsroom_auth::{DEFAULT_PROFILE_ID, DEFAULT_PROFILE_NAME, JwtManager};
use newsroom_db::Database;

const ADMIN_PROFILE_ID: i64 = 1;
const ADMIN_PROFILE_NAME: &str = "Administrador";

/// Newsroom - news publishing REST service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "NEWSROOM_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "NEWSROOM_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting Newsroom v{}", env!("CARGO_PKG_VERSION"));

    if config.uses_placeholder_secret() {
        warn!("auth.jwt_secret is the shipped placeholder; set a real secret before exposing this service");
    }

    // Create the data directory for the SQLite file
    if let Some(parent) = std::path::Path::new(&config.database.path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Initialize database
    let db_path = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_path).await?;

    // Seed the role catalogue
    db.ensure_profile(ADMIN_PROFILE_ID, ADMIN_PROFILE_NAME).await?;
    db.ensure_profile(DEFAULT_PROFILE_ID, DEFAULT_PROFILE_NAME).await?;

    // Create default admin user if no users exist
    if !db.has_users().await? {
        info!("Creating default admin user");
        let password_hash = newsroom_auth::hash_password("cambiar-admin")?;
        db.insert_user(newsroom_db::NewUser {
            username: "admin".to_string(),
            email: "admin@newsroom.local".to_string(),
            password_hash,
            perfil_id: ADMIN_PROFILE_ID,
            activo: true,
        })
        .await?;
        info!("Default admin user created (email: admin@newsroom.local, password: cambiar-admin)");
    }

    // Initialize JWT manager
    let jwt = Arc::new(JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.token_expiry_hours,
    ));

    // Create application state
    let state = AppState::new(db, jwt, config.auth.precheck_unique);

    // Create router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
