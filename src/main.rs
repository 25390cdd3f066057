use std::path::PathBuf;

use clap::Parser;

use batepapo::api::{self, AppState};
use batepapo::config::Config;
use batepapo::store::ChatStore;
use batepapo::sweeper;

#[derive(Parser)]
#[command(name = "batepapo", version, about = "Minimal chat backend with presence sweeping")]
struct Cli {
    /// Data directory for the database
    #[arg(long, env = "BATEPAPO_DATA_DIR", default_value = "./chat-data")]
    data_dir: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "batepapo=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config {
        data_dir: cli.data_dir,
        port: cli.port,
    };

    std::fs::create_dir_all(&config.data_dir)?;

    // Requests are only accepted once the store has opened successfully.
    let store = ChatStore::open(&config.db_path())?;

    tracing::info!(
        db = %config.db_path().display(),
        port = config.port,
        "batepapo starting"
    );

    let sweep_store = store.clone();
    tokio::spawn(async move {
        sweeper::run_sweep_loop(sweep_store).await;
    });

    let app = api::router(AppState { store });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
