use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "exhibit-view")]
#[command(about = "Exhibition scene viewer, headless driver")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a scene and print its tagged nodes.
    Inspect(InspectArgs),
    /// Replay a pointer script against a scene and print host notifications.
    Simulate(SimulateArgs),
}

#[derive(Args)]
pub struct InspectArgs {
    #[arg(long)]
    pub scene: PathBuf,
}

#[derive(Args)]
pub struct SimulateArgs {
    #[arg(long)]
    pub scene: PathBuf,
    #[arg(long)]
    pub script: PathBuf,
    #[arg(long)]
    pub config: Option<PathBuf>,
}
