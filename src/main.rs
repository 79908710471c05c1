use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use looplog::config::{Cli, Command, Config};
use looplog::db;
use looplog::routes;
use looplog::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::info!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;
    let db_path = config.db_path();
    let pool = db::create_pool(&db_path)?;
    tracing::info!("Database: {}", db_path.display());

    match cli.command.clone().unwrap_or(Command::Serve) {
        Command::Migrate { schema } => {
            db::run_schema_file(&pool, &schema)
                .with_context(|| format!("Migration from {} failed", schema.display()))?;
            Ok(())
        }
        Command::Serve => serve(pool, config).await,
    }
}

async fn serve(pool: looplog::state::DbPool, config: Config) -> anyhow::Result<()> {
    if !db::schema_applied(&pool)? {
        tracing::warn!("Database has no schema yet; run `looplog migrate` first");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = routes::app(AppState { db: pool, config });

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
