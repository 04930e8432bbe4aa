use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ladder_stats::api::{build_router, state::AppState};
use ladder_stats::config::AppConfig;
use ladder_stats::storage::LadderData;
use ladder_stats::store::{MemoryStore, Store};

#[derive(Parser)]
#[command(name = "ladder-stats")]
#[command(about = "Ranked ladder statistics: comps, standings, activity and representation")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load the ladder tables and print row counts
    Check,
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting ladder-stats v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let store = MemoryStore::load(&config.storage()).with_context(|| {
                format!("Failed to load ladder from {}", config.data_dir.display())
            })?;
            let store: Arc<dyn Store> = Arc::new(store);
            tracing::info!("Loaded {} store", store.name());

            let state = AppState::new(store, config.query, config.server.cors_origin.clone());
            let app = build_router(state);
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Check => {
            let storage = config.storage();
            let data = LadderData::load(&storage).with_context(|| {
                format!("Failed to load ladder from {}", storage.ladder_dir().display())
            })?;

            println!("Ladder tables in {}:", storage.ladder_dir().display());
            for (entity, count) in data.counts() {
                println!("  {:<24} {:>8}", entity.filename(), count);
            }
        }
    }

    Ok(())
}
