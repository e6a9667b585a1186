use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use where_is_everybody::app;
use where_is_everybody::config::Cli;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "where_is_everybody=info,wgpu=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    tracing::info!(assets = %cli.assets.display(), "starting where is everybody?");

    app::run(&cli).context("the library could not be opened")?;

    tracing::info!("window closed");
    Ok(())
}
