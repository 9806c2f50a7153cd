mod config;
mod journal;
mod pipeline;
mod risk;

use anyhow::Result;
use config::AppConfig;
use pipeline::Pipeline;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::load("config.toml")?;
    info!("Loaded configuration: {:?}", config);

    let mut pipeline = Pipeline::new(config)?;
    let summary = pipeline.run()?;
    info!(
        "accepted={} rejected={} sized={} promoted={}",
        summary.accepted, summary.rejected, summary.sized, summary.promoted
    );

    Ok(())
}
