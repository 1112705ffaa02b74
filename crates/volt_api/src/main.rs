use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use volt_api::{AppState, MarketplaceConfig, create_app};

/// Command line arguments for the SuryaVolt server
#[derive(Parser, Debug)]
#[command(name = "suryavolt")]
#[command(about = "SuryaVolt EV charging marketplace")]
struct Args {
    /// Path to the marketplace configuration JSON file
    #[arg(short, long)]
    config: PathBuf,

    /// Port to bind the server to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Directory for stored bookings, overrides `store.dataDir` from the config
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt().pretty().init();

    let config_content = tokio::fs::read_to_string(&args.config)
        .await
        .with_context(|| format!("Failed to read config file '{}'", args.config.display()))?;

    let mut config = MarketplaceConfig::from_json(&config_content)
        .with_context(|| format!("Failed to parse config file '{}'", args.config.display()))?;
    if let Some(data_dir) = args.data_dir {
        config.store.data_dir = Some(data_dir);
    }

    tracing::info!(
        "Loaded marketplace config from {}: {} stations",
        args.config.display(),
        config.stations.len()
    );

    let app_state = AppState::new(config);
    let app = create_app(app_state);

    let bind_addr = format!("0.0.0.0:{}", args.port);
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
