use anyhow::Result;
use clap::{Parser, Subcommand};

use imgpipe::{process, send};

#[derive(Parser, Debug)]
#[command(name = "imgpipe", about = "Parallel grayscale filtering over a named pipe")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode an image and stream it over the pipe
    Send(send::SendArgs),
    /// Receive an image, filter it across a worker pool, and save it
    Process(process::ProcessArgs),
}

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    match Cli::parse().command {
        Command::Send(args) => send::run(args),
        Command::Process(args) => process::run(args),
    }
}
