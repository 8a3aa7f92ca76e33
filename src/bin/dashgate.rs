use anyhow::Result;
use dashgate::cli::{start, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let action = start()?;

    action.execute().await?;

    telemetry::shutdown_tracer();

    Ok(())
}
