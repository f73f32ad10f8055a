//! Trains the iris classifier and writes the model artifact.

use anyhow::Result;
use clap::Parser;
use iris_cli::{init_tracing, TrainCommand};

fn main() -> Result<()> {
    init_tracing()?;

    let cmd = TrainCommand::parse();
    let report = cmd.run()?;

    println!(
        "Model trained and saved at {}",
        report.artifact_path.display()
    );
    Ok(())
}
