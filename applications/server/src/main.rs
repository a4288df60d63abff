/// Chorus Server - playlist service HTTP front
use chorus_server::{
    api,
    config::ServerConfig,
    services::{AuthService, FileThumbnailStore, PlaylistService},
    state::AppState,
};
use chorus_storage::SqlitePlaylistRepository;
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chorus-server")]
#[command(about = "Chorus playlist service", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "CHORUS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chorus_server=info,chorus_storage=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::Migrate => migrate(config).await?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Chorus Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool = chorus_storage::create_pool(&config.storage.database_url).await?;
    chorus_storage::run_migrations(&pool).await?;
    let repo = Arc::new(SqlitePlaylistRepository::new(pool));
    tracing::info!("Database connected");

    // Initialize thumbnail storage
    let thumbnails = FileThumbnailStore::new(
        config.storage.thumbnail_path.clone(),
        config.storage.max_thumbnail_bytes,
    );
    thumbnails.initialize().await?;
    let thumbnails = Arc::new(thumbnails);
    tracing::info!("Thumbnail storage initialized");

    // Initialize auth service
    let auth_service = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    ));

    let playlists = Arc::new(PlaylistService::new(repo, thumbnails));
    let shutdown = CancellationToken::new();

    // Build application state
    let app_state = AppState::new(playlists, auth_service, shutdown.clone());

    // Build router
    let app = api::create_router(app_state, &config.storage);

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl-C and cancel every in-flight request context
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown requested");
    shutdown.cancel();
}

async fn migrate(config: ServerConfig) -> anyhow::Result<()> {
    let pool = chorus_storage::create_pool(&config.storage.database_url).await?;
    chorus_storage::run_migrations(&pool).await?;

    tracing::info!("Migrations applied to {}", config.storage.database_url);
    Ok(())
}
