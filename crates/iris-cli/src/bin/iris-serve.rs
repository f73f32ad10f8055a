//! Serves iris predictions over HTTP.

use anyhow::Result;
use clap::Parser;
use iris_cli::{init_tracing, ServeCommand};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let cmd = ServeCommand::parse();
    info!(
        model_path = %cmd.model_path.display(),
        host = %cmd.host,
        port = cmd.port,
        "iris-serve starting"
    );
    cmd.run().await?;

    info!("iris-serve stopped");
    Ok(())
}
